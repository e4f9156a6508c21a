// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

//! Prompts and progress shared by the commands.

use std::borrow::Cow;
use std::time::Duration;

use colored::Colorize;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result};

/// Ask a yes/no question, defaulting to no.
pub fn confirm<S: Into<String>>(prompt: S) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

/// Report a declined prompt. Declining is not an error.
pub fn cancelled() -> i32 {
    println!("{}", "Operation cancelled!".red());
    0
}

pub fn spinner<M: Into<Cow<'static, str>>>(message: M) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Split the raw `--launch-args` value, if any.
pub fn launch_args(raw: Option<&str>) -> Vec<String> {
    raw.map(envbench::descriptor::split_launch_args)
        .unwrap_or_default()
}
