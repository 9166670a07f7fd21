use crate::config::save_user_config;
use crate::io::{default_file_name, print_wrote};
use crate::parse::parse_quote;
use crate::run::report_rendered;
use dialoguer::{Confirm, Input, Select};
use quotecard_core::{
    compose, fetch_random_quote, valid_background_styles, valid_decoration_styles, valid_themes,
    BackgroundStyle, ComposeRequest, Config, GradientDirection, History, HistoryEntry, Rendered,
};
use std::error::Error;
use std::fs;
use std::path::Path;

pub(crate) fn run_interactive(config: &mut Config) -> Result<(), Box<dyn Error>> {
    let prompter = DialoguerPrompter;
    let mut history = History::new(config.history.size);
    run_interactive_with(&prompter, config, &mut history)
}

pub(crate) trait Prompter {
    fn select(&self, prompt: &str, items: &[&str], default: usize)
        -> Result<usize, Box<dyn Error>>;
    fn input_string(
        &self,
        prompt: &str,
        default: Option<&str>,
        allow_empty: bool,
    ) -> Result<String, Box<dyn Error>>;
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, Box<dyn Error>>;
}

struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn select(
        &self,
        prompt: &str,
        items: &[&str],
        default: usize,
    ) -> Result<usize, Box<dyn Error>> {
        Ok(Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn input_string(
        &self,
        prompt: &str,
        default: Option<&str>,
        allow_empty: bool,
    ) -> Result<String, Box<dyn Error>> {
        let mut input = Input::new().with_prompt(prompt).allow_empty(allow_empty);
        if let Some(value) = default {
            input = input.default(value.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, Box<dyn Error>> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

/// Builds cards until the user stops, keeping each one in `history`.
pub(crate) fn run_interactive_with(
    prompter: &dyn Prompter,
    config: &mut Config,
    history: &mut History,
) -> Result<(), Box<dyn Error>> {
    run_session(prompter, config, history, &compose)
}

type RenderFn<'a> = &'a dyn Fn(&ComposeRequest) -> quotecard_core::Result<Rendered>;

fn run_session(
    prompter: &dyn Prompter,
    config: &mut Config,
    history: &mut History,
    render: RenderFn<'_>,
) -> Result<(), Box<dyn Error>> {
    let mut notice_shown = false;
    loop {
        let (suggested_quote, suggested_author) = prompt_source(prompter, config, history)?;
        let raw = prompter.input_string("Quote", suggested_quote.as_deref(), false)?;
        let quote = match parse_quote(&raw) {
            Ok(quote) => quote,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };
        let author = prompter.input_string(
            "Author (empty for none)",
            suggested_author.as_deref(),
            true,
        )?;
        let author = author.trim().to_string();

        prompt_style(prompter, config)?;

        let rendered = match render(&ComposeRequest {
            quote: quote.clone(),
            author: author.clone(),
            config: config.clone(),
        }) {
            Ok(rendered) => rendered,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };
        report_rendered(&rendered, &mut notice_shown);
        let id = history.push(
            &quote,
            &author,
            rendered.bytes.clone(),
            config.theme,
            config.background,
            config.decoration,
        );
        log::info!("generated card {id}");

        let default_path = default_file_name(&quote, &author);
        let path = prompter.input_string("Save PNG to (empty to skip)", Some(&default_path), true)?;
        let path = path.trim();
        if !path.is_empty() {
            match fs::write(path, &rendered.bytes) {
                Ok(()) => print_wrote(Path::new(path)),
                Err(err) => eprintln!("ERROR: unable to write {path}: {err}"),
            }
        }

        if !prompter.confirm("Create another card?", false)? {
            break;
        }
    }

    print_history(history);
    if prompter.confirm("Save these settings as your user config?", false)? {
        let path = save_user_config(config)?;
        println!("SAVED {}", path.display());
    }
    Ok(())
}

type Suggestion = (Option<String>, Option<String>);

fn prompt_source(
    prompter: &dyn Prompter,
    config: &mut Config,
    history: &History,
) -> Result<Suggestion, Box<dyn Error>> {
    let mut sources = vec!["type it", "random from the web"];
    if !history.is_empty() {
        sources.push("reuse a previous card");
    }
    match prompter.select("Quote source", &sources, 0)? {
        1 => match fetch_random_quote(&config.api) {
            Ok(quote) => Ok((Some(quote.text), Some(quote.author))),
            Err(err) => {
                eprintln!("WARNING: {err}");
                Ok((None, None))
            }
        },
        2 if !history.is_empty() => reuse_entry(prompter, config, history),
        _ => Ok((None, None)),
    }
}

/// Restores the styles of a history entry and suggests its texts.
fn reuse_entry(
    prompter: &dyn Prompter,
    config: &mut Config,
    history: &History,
) -> Result<Suggestion, Box<dyn Error>> {
    let ids: Vec<&str> = history.iter().map(|entry| entry.id.as_str()).collect();
    let labels: Vec<String> = history.iter().map(entry_label).collect();
    let items: Vec<&str> = labels.iter().map(String::as_str).collect();
    let choice = prompter.select("Card to reuse", &items, 0)?;
    let Some(entry) = ids.get(choice).and_then(|id| history.get(id)) else {
        return Ok((None, None));
    };
    config.theme = entry.theme;
    config.background = entry.background;
    config.decoration = entry.decoration;
    log::debug!("reusing card {}", entry.id);
    Ok((Some(entry.quote.clone()), Some(entry.author.clone())))
}

fn prompt_style(prompter: &dyn Prompter, config: &mut Config) -> Result<(), Box<dyn Error>> {
    let themes = valid_themes();
    let ids: Vec<&str> = themes.iter().map(|theme| theme.id()).collect();
    let current = themes.iter().position(|t| *t == config.theme).unwrap_or(0);
    config.theme = themes[prompter.select("Theme", &ids, current)?.min(themes.len() - 1)];

    let backgrounds = valid_background_styles();
    let ids: Vec<&str> = backgrounds.iter().map(|style| style.id()).collect();
    let current = backgrounds
        .iter()
        .position(|s| *s == config.background)
        .unwrap_or(0);
    config.background =
        backgrounds[prompter.select("Background", &ids, current)?.min(backgrounds.len() - 1)];

    if config.background == BackgroundStyle::Gradient {
        let directions = [GradientDirection::Vertical, GradientDirection::Horizontal];
        let ids: Vec<&str> = directions.iter().map(|d| d.id()).collect();
        let current = directions
            .iter()
            .position(|d| *d == config.gradient_direction)
            .unwrap_or(0);
        config.gradient_direction =
            directions[prompter.select("Gradient direction", &ids, current)?.min(1)];
    }

    let decorations = valid_decoration_styles();
    let ids: Vec<&str> = decorations.iter().map(|style| style.id()).collect();
    let current = decorations
        .iter()
        .position(|s| *s == config.decoration)
        .unwrap_or(0);
    config.decoration =
        decorations[prompter.select("Decoration", &ids, current)?.min(decorations.len() - 1)];

    config.signature = prompter.confirm("Add signature?", config.signature)?;
    config.watermark = prompter.confirm("Add watermark?", config.watermark)?;
    Ok(())
}

fn print_history(history: &History) {
    if history.is_empty() {
        return;
    }
    println!("Recent cards ({} of {} kept):", history.len(), history.capacity());
    for entry in history.iter() {
        println!("  {}", entry_label(entry));
    }
}

fn entry_label(entry: &HistoryEntry) -> String {
    let author = if entry.author.is_empty() {
        String::new()
    } else {
        format!(" \u{2014} {}", entry.author)
    };
    format!(
        "{}  [{} / {} / {}] {}{}",
        entry.id,
        entry.theme,
        entry.background,
        entry.decoration,
        truncate(&entry.quote, 40),
        author
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
