//! Interactive prompts for job parameters (used when no input file exists).

use anyhow::{Context, Result};
use bdl_core::job::JobInput;
use std::io::{BufRead, Write};

/// Ask for count, parallelism and save path. An empty save path is left as
/// `None` so the configured default applies.
pub fn prompt_job_input<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default_save_path: &str,
) -> Result<JobInput> {
    let count = ask(input, output, "Enter the number of images to download:")?;
    let count: i64 = count
        .parse()
        .with_context(|| format!("invalid image count {:?}", count))?;

    let parallelism = ask(input, output, "Enter the maximum parallel download limit:")?;
    let parallelism: i64 = parallelism
        .parse()
        .with_context(|| format!("invalid parallel download limit {:?}", parallelism))?;

    let save_path = ask(
        input,
        output,
        &format!("Enter the save path (default: {}):", default_save_path),
    )?;

    Ok(JobInput {
        count,
        parallelism,
        save_path: (!save_path.is_empty()).then_some(save_path),
    })
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    writeln!(output, "{}", question)?;
    output.flush()?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context("reading answer")?;
    if n == 0 {
        anyhow::bail!("no answer to {:?} (end of input)", question);
    }
    Ok(line.trim().to_string())
}
