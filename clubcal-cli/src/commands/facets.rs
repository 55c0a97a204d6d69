use anyhow::Result;
use clubcal_core::Widget;
use clubcal_core::taxonomy::Facet;
use owo_colors::OwoColorize;

pub async fn run(mut widget: Widget) -> Result<()> {
    // Committee options come from the events themselves.
    super::load(&mut widget, false).await?;

    for facet in widget.facets() {
        println!("{} {}", facet.label.bold(), format!("--{}", flag(facet.facet)).dimmed());

        if facet.options.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for option in &facet.options {
            if option.id == option.label {
                println!("  {}", option.id);
            } else {
                println!("  {} {}", option.id, option.label.dimmed());
            }
        }
        println!();
    }

    let quick = widget.quick_filters();
    if !quick.is_empty() {
        println!("{} {}", "Quick filters".bold(), "--quick".dimmed());
        for q in quick {
            println!("  {} {}", q.id, q.label.dimmed());
        }
    }

    Ok(())
}

fn flag(facet: Facet) -> &'static str {
    match facet {
        Facet::InterestArea => "interest",
        Facet::Committee => "committee",
        Facet::Cost => "cost",
        Facet::TimeOfDay => "time",
    }
}
