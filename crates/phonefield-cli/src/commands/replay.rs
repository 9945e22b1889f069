use crate::commands::{print_json, Context};
use crate::util::validity_label;
use anyhow::{Context as _, Result};
use clap::Args;
use phonefield_core::{FieldEvent, FieldOutcome, FieldState, FocusIntent, MaskTiming, PhoneField};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Event script; stdin when omitted
    pub file: Option<PathBuf>,
    /// Value the field starts with
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub initial: String,
    /// Override the configured mask timing
    #[arg(long, value_enum)]
    pub timing: Option<TimingArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum TimingArg {
    Keystroke,
    Blur,
}

impl From<TimingArg> for MaskTiming {
    fn from(timing: TimingArg) -> Self {
        match timing {
            TimingArg::Keystroke => MaskTiming::Keystroke,
            TimingArg::Blur => MaskTiming::Blur,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReplayStepDto {
    line: usize,
    event: String,
    #[serde(flatten)]
    outcome: FieldOutcome,
    state: FieldState,
}

pub fn replay(ctx: &Context<'_>, args: ReplayArgs) -> Result<()> {
    let script = read_script(args.file.as_deref())?;
    let events = parse_script(&script)?;
    let timing = args
        .timing
        .map(MaskTiming::from)
        .unwrap_or(ctx.config.mask_timing);
    debug!(events = events.len(), ?timing, "replaying field events");

    let mut field = PhoneField::new(ctx.engine, timing, &args.initial)
        .with_context(|| format!("initial value {:?}", args.initial))?;

    let mut steps = Vec::with_capacity(events.len());
    for (line, event) in events {
        let label = event.to_string();
        let outcome = field
            .handle(event)
            .with_context(|| format!("line {}: {}", line, label))?;
        steps.push(ReplayStepDto {
            line,
            event: label,
            outcome,
            state: field.state().clone(),
        });
    }

    if ctx.json {
        return print_json(&steps);
    }

    for step in steps {
        println!("{}", describe_step(&step));
    }
    let state = field.state();
    println!(
        "final: {} [{}] {}",
        state.value,
        state.display_value,
        validity_label(state.is_valid)
    );
    Ok(())
}

fn read_script(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .with_context(|| "read stdin")?;
            Ok(buf)
        }
    }
}

fn parse_script(script: &str) -> Result<Vec<(usize, FieldEvent)>> {
    let mut events = Vec::new();
    for (index, raw) in script.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = line
            .parse::<FieldEvent>()
            .with_context(|| format!("line {}", index + 1))?;
        events.push((index + 1, event));
    }
    Ok(events)
}

fn describe_step(step: &ReplayStepDto) -> String {
    let mut out = format!("{}: {} ->", step.line, step.event);
    match &step.outcome.change {
        Some(change) => out.push_str(&format!(
            " {} [{}] {}",
            change.international_value,
            change.display_value,
            validity_label(change.is_valid)
        )),
        None => out.push_str(" no change"),
    }
    if let Some(FocusIntent::RestoreInput) = step.outcome.focus {
        out.push_str(" (focus input)");
    }
    out
}
