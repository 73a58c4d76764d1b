use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tinysh::Interpreter;
use tinysh::config::ShellConfig;
use tinysh::io_adapters::{EditorLines, LineSource, PlainLines};
use tinysh::{SHELL_NAME, logger};

fn main() -> ExitCode {
    let config: ShellConfig = argh::from_env();

    if let Err(e) = logger::init_logging(&config.log_level) {
        eprintln!("{SHELL_NAME}: can't initialize logging: {e}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "interpreter failed");
            eprintln!("{SHELL_NAME}: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ShellConfig) -> anyhow::Result<()> {
    let mut source: Box<dyn LineSource> = if config.use_line_editor(io::stdin().is_terminal()) {
        Box::new(EditorLines::new()?)
    } else {
        Box::new(PlainLines::new(io::stdin().lock(), io::stdout()))
    };

    Interpreter::default()
        .with_prompt(config.prompt.clone())
        .repl(source.as_mut())
}
