//! A command line window into the panel's view of the X-Server

#![deny(
    clippy::all,
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    absolute_paths_not_starting_with_crate,
    anonymous_parameters,
    bad_style,
    keyword_idents,
    macro_use_extern_crate,
    non_shorthand_field_patterns,
    noop_method_call,
    overflowing_literals,
    path_statements,
    semicolon_in_expressions_from_macros,
    unconditional_recursion,
    unsafe_code,
    while_true
)]

#[macro_use]
mod macros;

mod cli;
mod config;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Command, Opts};
use colored::Colorize;
use config::Config;
use panelx::{
    query,
    MessageSender,
    WindowNameExt,
    XConnection,
    XContext,
};
use serde::Serialize;
use x11rb::protocol::xproto::Window;

/// Print `value` as JSON
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

/// `panelx monitors`
fn monitors(xconn: &XConnection, json: bool) -> Result<()> {
    if json {
        return print_json(xconn.monitors());
    }

    for (idx, monitor) in xconn.monitors().iter().enumerate() {
        println!("{}: {}", idx, monitor);
    }
    Ok(())
}

/// `panelx tasks`
fn tasks(xconn: &XConnection, json: bool) -> Result<()> {
    let clients = xconn.client_list()?;
    let tasks = query::task_list(xconn, &clients)?;
    if json {
        return print_json(&tasks);
    }

    let active = xconn.active_window()?;
    let current = xconn.current_desktop()?;
    for task in &tasks {
        let marker = if Some(task.window) == active { "*" } else { " " };
        let line = format!("{} {}", marker, task);
        if task.state.desktop == current {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

/// `panelx name <window>`
fn name(xconn: &XConnection, window: Window, json: bool) -> Result<()> {
    let guard = xconn.error_trap().enter()?;
    let name = xconn.resolve_name(window)?;
    if guard.release() {
        panelx_error!("Window({:#0x}) does not exist", window);
        std::process::exit(1);
    }

    if json {
        return print_json(&name);
    }

    match name.source {
        Some(source) => println!("{} ({} {})", name.text, source.property, source.type_),
        None => println!("{}", name.text),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Opts::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    }
    .unwrap_or_else(|e| panelx_fatal!("{:#}", e));

    if args.display.is_some() {
        config.display = args.display.clone();
    }

    let (_logger, log_dir) = utils::initialize_logging(&config, &args)?;
    if config.log_to_file {
        log::debug!("{}: {}", "logging to".bright_blue(), log_dir.display());
    }
    log::debug!("{}: {:#?}", "configuration options".bright_blue(), config);

    let xconn = XConnection::connect(config.display.as_deref(), &config.monitor_detection)
        .unwrap_or_else(|e| panelx_fatal!("{}", e));

    match args.command.clone().unwrap_or_default() {
        Command::Monitors => monitors(&xconn, args.json)?,
        Command::Tasks => tasks(&xconn, args.json)?,
        Command::Name { window } => name(&xconn, window, args.json)?,
        Command::Activate { window } => {
            xconn.activate_window(window)?;
            panelx_info!("requested activation of Window({:#0x})", window);
        },
        Command::Close { window } => {
            xconn.close_window(window)?;
            panelx_info!("requested closing of Window({:#0x})", window);
        },
    }

    Ok(())
}
