use crate::commands::{print_json, Context};
use crate::error::invalid_phone;
use crate::util::{country_label, parse_country, validity_label};
use anyhow::{Context as _, Result};
use clap::Args;
use phonefield_core::{build_result, DisplayMode, FormatOutputDto, ParsedPhone, PhoneResult};
use tracing::debug;

#[derive(Debug, Args)]
pub struct PhoneArgs {
    #[arg(allow_hyphen_values = true)]
    pub value: String,
    /// Treat the value as belonging to this country (ISO3)
    #[arg(long)]
    pub country: Option<String>,
}

fn compute(ctx: &Context<'_>, args: &PhoneArgs) -> Result<(ParsedPhone, PhoneResult)> {
    let country = args.country.as_deref().map(parse_country).transpose()?;
    let parsed = ctx
        .engine
        .parse(&args.value, country.as_deref())
        .with_context(|| format!("resolve {:?}", args.value))?;
    let result = build_result(&parsed, ctx.engine.rules(), DisplayMode::Masked);
    debug!(
        country = country_label(parsed.selected_country_iso.as_deref()),
        national = %parsed.national_digits,
        display = %result.display_value,
        valid = result.is_valid,
        "computed phone result"
    );
    Ok((parsed, result))
}

pub fn format(ctx: &Context<'_>, args: PhoneArgs) -> Result<()> {
    let (parsed, result) = compute(ctx, &args)?;

    if ctx.json {
        return print_json(&FormatOutputDto::new(&args.value, &parsed, &result));
    }

    println!("display: {}", result.display_value);
    println!("international: {}", result.international_value);
    println!(
        "country: {}",
        country_label(parsed.selected_country_iso.as_deref())
    );
    println!("status: {}", validity_label(result.is_valid));
    Ok(())
}

pub fn parse(ctx: &Context<'_>, args: PhoneArgs) -> Result<()> {
    let (parsed, _) = compute(ctx, &args)?;

    if ctx.json {
        return print_json(&parsed);
    }

    println!(
        "{} {}",
        country_label(parsed.selected_country_iso.as_deref()),
        parsed.national_digits
    );
    Ok(())
}

pub fn validate(ctx: &Context<'_>, args: PhoneArgs) -> Result<()> {
    let (parsed, result) = compute(ctx, &args)?;

    if ctx.json {
        print_json(&FormatOutputDto::new(&args.value, &parsed, &result))?;
    } else if result.is_valid {
        println!("{} is valid", result.international_value);
    }

    if !result.is_valid {
        return Err(invalid_phone(result.international_value));
    }
    Ok(())
}
