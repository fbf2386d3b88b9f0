//! Interactive browsing shell
//!
//! Each line is one mutation of the filter store. The store's change
//! notification marks the session as needing a query or only a repaint, and
//! the loop acts on that after the command.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use boardshelf_core::{
    CatalogSession, Change, FacetKind, FilterField, FilterStore, MultiField, QueryOutcome, SortColumn,
    SortDirection, ViewMode,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::client::HttpCatalogApi;
use crate::output;

const HELP: &str = "\
Commands:
  toggle <mechanic>          add or remove a mechanic
  set <field> <value>        year_min, year_max, players, time_max, weight_min,
                             weight_max, rating_min, search
  unset <field>
  pick <facet> <a,b,...>     categories, designers, artists, publishers (empty clears)
  sort <column>|off          same column again flips the direction
  view tile|list
  clear                      reset all filters (keeps the view)
  refresh [username]
  facets [facet]
  summary | show | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Toggle(String),
    Set(FilterField, String),
    Unset(FilterField),
    Pick(MultiField, Vec<String>),
    Sort(Option<SortColumn>),
    View(ViewMode),
    Clear,
    Refresh(Option<String>),
    Facets(Option<FacetKind>),
    Summary,
    Show,
    Help,
    Quit,
}

fn split_word(line: &str) -> (&str, &str) {
    match line.trim().split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line.trim(), ""),
    }
}

fn required<'a>(rest: &'a str, what: &str) -> Result<&'a str, String> {
    if rest.is_empty() { Err(format!("missing {}", what)) } else { Ok(rest) }
}

pub fn parse(line: &str) -> Result<Command, String> {
    let (word, rest) = split_word(line);
    match word {
        "toggle" => Ok(Command::Toggle(required(rest, "mechanic")?.to_string())),
        "set" => {
            let (field, value) = split_word(required(rest, "field")?);
            Ok(Command::Set(field.parse()?, required(value, "value")?.to_string()))
        }
        "unset" => Ok(Command::Unset(required(rest, "field")?.parse()?)),
        "pick" => {
            let (facet, values) = split_word(required(rest, "facet")?);
            let kind: FacetKind = facet.parse()?;
            let field = MultiField::try_from(kind)
                .map_err(|_| "mechanics are picked with 'toggle'".to_string())?;
            let values = values.split(',').map(str::to_string).collect();
            Ok(Command::Pick(field, values))
        }
        "sort" => match required(rest, "column")? {
            "off" | "none" => Ok(Command::Sort(None)),
            column => Ok(Command::Sort(Some(column.parse()?))),
        },
        "view" => Ok(Command::View(required(rest, "view mode")?.parse()?)),
        "clear" => Ok(Command::Clear),
        "refresh" => Ok(Command::Refresh((!rest.is_empty()).then(|| rest.to_string()))),
        "facets" => match rest {
            "" => Ok(Command::Facets(None)),
            kind => Ok(Command::Facets(Some(kind.parse()?))),
        },
        "summary" => Ok(Command::Summary),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}' (try 'help')", other)),
    }
}

fn report(outcome: &QueryOutcome) {
    if let Some(e) = outcome.error() {
        eprintln!("Warning: {}", e.user_message());
    }
}

pub async fn run(session: &CatalogSession<HttpCatalogApi>, store: &mut FilterStore) -> Result<()> {
    let needs_query = Rc::new(Cell::new(false));
    let needs_paint = Rc::new(Cell::new(false));
    {
        let needs_query = Rc::clone(&needs_query);
        let needs_paint = Rc::clone(&needs_paint);
        store.subscribe(move |_, change: Change| {
            if change.requires_query() {
                needs_query.set(true);
            }
            needs_paint.set(true);
        });
    }

    if let Err(e) = session.load_facets().await {
        eprintln!("Warning: {}", e.user_message());
    }
    report(&session.query(store.snapshot()).await);
    println!("{}", output::view(&session.render(store.snapshot())));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            Command::Toggle(name) => store.toggle_mechanic(&name),
            Command::Set(field, value) => {
                if let Err(e) = store.set(field, &value) {
                    eprintln!("{}", e);
                }
            }
            Command::Unset(field) => store.unset(field),
            Command::Pick(field, values) => store.set_multi(field, values),
            Command::Sort(Some(column)) => store.activate_column(column),
            Command::Sort(None) => store.set_sort(None, SortDirection::Asc),
            Command::View(mode) => store.set_view_mode(mode),
            Command::Clear => store.clear(),
            Command::Refresh(username) => {
                let spinner = crate::spinner("Refreshing collection...");
                let result = session.refresh(username.as_deref(), || store.snapshot().clone()).await;
                spinner.finish_and_clear();
                match result {
                    Ok(refreshed) => {
                        if let Some(summary) = session.api().last_refresh() {
                            println!(
                                "Refreshed {}: {} of {} games loaded",
                                summary.username, summary.total_hydrated, summary.total_in_collection
                            );
                        }
                        if let Some(e) = &refreshed.facets_error {
                            eprintln!("Warning: {}", e.user_message());
                        }
                        report(&refreshed.query);
                        needs_paint.set(true);
                    }
                    Err(e) => eprintln!("Refresh failed. {}", e.user_message()),
                }
            }
            Command::Facets(kind) => match session.catalog() {
                Some(catalog) => println!("{}", output::facets(&catalog, kind, usize::MAX)),
                None => eprintln!("Facets are not loaded"),
            },
            Command::Summary => println!("{}", output::summary(store.snapshot())),
            Command::Show => needs_paint.set(true),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }

        if needs_query.replace(false) {
            report(&session.query(store.snapshot()).await);
        }
        if needs_paint.replace(false) {
            println!("{}", output::view(&session.render(store.snapshot())));
        }
    }

    Ok(())
}
