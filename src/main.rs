use clap::Parser;
use miette::Result;
use regwiz::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Run(args) => regwiz::cli::commands::run::run(args, &global),
        Commands::Steps(cmd) => regwiz::cli::commands::steps::run(cmd, &global),
        Commands::Validate(args) => regwiz::cli::commands::validate::run(args, &global),
        Commands::Completions(args) => regwiz::cli::commands::completions::run(args),
    }
}
