use crate::args::Args;
use crate::config::load_config;
use crate::interactive::run_interactive;
use crate::io::{default_file_name, read_stdin_with, write_output_with_tty};
use crate::parse::{parse_quote, parse_timeout_ms};
use clap::{CommandFactory, Parser};
use quotecard_core::{compose, fetch_random_quote, ComposeRequest, Config, RenderStatus, Rendered};
use std::error::Error;

pub(crate) fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    run_with(
        args,
        atty::is(atty::Stream::Stdin),
        atty::is(atty::Stream::Stdout),
        None,
    )
}

pub(crate) fn run_with(
    args: Args,
    stdin_is_tty: bool,
    stdout_is_tty: bool,
    stdin_override: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args)?;

    if args.interactive {
        if !stdin_is_tty || !stdout_is_tty {
            return Err("interactive mode requires a TTY".into());
        }
        return run_interactive(&mut config);
    }

    let (quote, fetched_author) = if args.random {
        let quote = fetch_random_quote(&config.api)?;
        (quote.text, Some(quote.author))
    } else {
        match args.quote.as_deref() {
            Some("-") => (read_stdin_with(stdin_override)?, None),
            Some(text) => (text.to_string(), None),
            None if stdin_is_tty && stdin_override.is_none() => {
                let mut cmd = Args::command();
                cmd.print_help()?;
                println!();
                return Ok(());
            }
            None => (read_stdin_with(stdin_override)?, None),
        }
    };
    let quote = parse_quote(&quote)?;
    let author = args
        .author
        .clone()
        .or(fetched_author)
        .unwrap_or_default();

    let default_name = default_file_name(&quote, &author);
    let rendered = compose(&ComposeRequest {
        quote,
        author,
        config,
    })?;
    let mut notice_shown = false;
    report_rendered(&rendered, &mut notice_shown);

    write_output_with_tty(
        &rendered.bytes,
        args.output.as_ref(),
        &default_name,
        stdout_is_tty,
    )
}

pub(crate) fn apply_overrides(config: &mut Config, args: &Args) -> Result<(), Box<dyn Error>> {
    if let Some(theme) = args.theme {
        config.theme = theme.into();
    }
    if let Some(background) = args.background {
        config.background = background.into();
    }
    if let Some(direction) = args.gradient {
        config.gradient_direction = direction.into();
    }
    if let Some(decoration) = args.decoration {
        config.decoration = decoration.into();
    }
    if let Some(signature) = args.signature {
        config.signature = signature;
    }
    if let Some(watermark) = args.watermark {
        config.watermark = watermark;
    }
    if let Some(text) = &args.signature_text {
        config.signature_text = text.clone();
    }
    if let Some(text) = &args.watermark_text {
        config.watermark_text = text.clone();
    }
    if let Some(dir) = &args.font_dir {
        config.font.dir = dir.clone();
    }
    if let Some(url) = &args.api_url {
        config.api.url = url.clone();
    }
    if let Some(timeout) = &args.api_timeout {
        config.api.timeout_ms = parse_timeout_ms(timeout)?;
    }
    if let Some(optimize) = args.png_opt {
        config.png.optimize = optimize;
    }
    if let Some(level) = args.png_opt_level {
        config.png.level = level;
    }
    if let Some(strip) = args.png_strip {
        config.png.strip = strip.into();
    }
    Ok(())
}

/// Surfaces font fallback notices (once per process) and degraded renders.
pub(crate) fn report_rendered(rendered: &Rendered, notice_shown: &mut bool) {
    if rendered.fallback_font && !*notice_shown {
        for notice in &rendered.notices {
            eprintln!("NOTE: {notice}");
        }
        *notice_shown = true;
    }
    if let RenderStatus::Degraded(reason) = &rendered.status {
        eprintln!("WARNING: text rendering failed: {reason}");
    }
}
