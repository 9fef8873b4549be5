use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    stackforge completions --shell bash > ~/.bash_completion.d/stackforge\n\n\
                  Generate zsh completions:\n    stackforge completions --shell zsh > ~/.zfunc/_stackforge\n\n\
                  Generate fish completions:\n    stackforge completions --shell fish > ~/.config/fish/completions/stackforge.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
