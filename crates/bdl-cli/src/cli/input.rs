//! Resolve the job input: flags, then the job input file, then prompts.

use anyhow::Result;
use bdl_core::config::BdlConfig;
use bdl_core::job::JobInput;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::prompt::prompt_job_input;
use super::RunArgs;

/// Where the job parameters came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOrigin {
    Flags,
    File(PathBuf),
    Prompt,
}

/// Resolve using the process stdin/stdout for prompts.
pub fn resolve_job_input(args: &RunArgs, cfg: &BdlConfig) -> Result<(JobInput, InputOrigin)> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    resolve_job_input_with(args, cfg, &mut stdin.lock(), &mut stdout)
}

pub fn resolve_job_input_with<R: BufRead, W: Write>(
    args: &RunArgs,
    cfg: &BdlConfig,
    reader: &mut R,
    writer: &mut W,
) -> Result<(JobInput, InputOrigin)> {
    if let (Some(count), Some(parallelism)) = (args.count, args.parallelism) {
        let input = JobInput {
            count,
            parallelism,
            save_path: args.save_path.clone(),
        };
        return Ok((input, InputOrigin::Flags));
    }

    let path = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.input_file));
    if let Some(mut input) = JobInput::load(&path)? {
        writeln!(
            writer,
            "Input file has already exist, then will continue with the file"
        )?;
        // Individual flags still win over the file.
        if let Some(count) = args.count {
            input.count = count;
        }
        if let Some(parallelism) = args.parallelism {
            input.parallelism = parallelism;
        }
        if args.save_path.is_some() {
            input.save_path = args.save_path.clone();
        }
        tracing::debug!(path = %path.display(), "job input read from file");
        return Ok((input, InputOrigin::File(path)));
    }

    let mut input = prompt_job_input(reader, writer, &cfg.default_save_path)?;
    if args.save_path.is_some() {
        input.save_path = args.save_path.clone();
    }
    Ok((input, InputOrigin::Prompt))
}
