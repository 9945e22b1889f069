use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::parse_country;
use anyhow::Result;
use clap::Args;
use phonefield_core::CountryRuleDto;

#[derive(Debug, Args)]
pub struct CountriesArgs {
    /// Show a single country
    pub country: Option<String>,
}

pub fn list_countries(ctx: &Context<'_>, args: CountriesArgs) -> Result<()> {
    let items: Vec<CountryRuleDto> = match args.country.as_deref() {
        Some(raw) => {
            let iso = parse_country(raw)?;
            let rule = ctx
                .engine
                .rule(&iso)
                .ok_or_else(|| not_found(format!("country {}", iso)))?;
            vec![CountryRuleDto::from(rule)]
        }
        None => ctx
            .engine
            .countries()
            .iter()
            .map(CountryRuleDto::from)
            .collect(),
    };

    if ctx.json {
        return print_json(&items);
    }

    let default_iso = ctx.engine.default_country_iso();
    for item in items {
        let marker = if item.country_iso == default_iso { "*" } else { " " };
        let mut line = format!("{} {} +{}", marker, item.country_iso, item.country_code);
        if let Some(mask) = &item.mask {
            line.push_str(&format!("  {}", mask));
        }
        if let Some(pattern) = &item.pattern {
            line.push_str(&format!("  /{}/", pattern));
        }
        println!("{}", line);
    }
    Ok(())
}
