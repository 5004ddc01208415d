//! Colored output helpers for the CLI.

use owo_colors::OwoColorize;

/// Output style configuration.
pub struct Output {
    /// Whether to use colored output.
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled.
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled.
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the S.A.G.E banner.
    pub fn banner(&self) {
        if self.colored {
            println!(
                r#"
   {}
   {}
   {}
   {}
   {}
"#,
                r"  ____    _    ____ _____ ".bright_cyan().bold(),
                r" / ___|  / \  / ___| ____|".bright_cyan().bold(),
                r" \___ \ / _ \| |  _|  _|  ".cyan().bold(),
                r"  ___) / ___ \ |_| | |___ ".blue().bold(),
                r" |____/_/   \_\____|_____|".blue().bold(),
            );
            println!(
                "   {} {}\n",
                "School Assistant Grounded Engine".bright_white().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!(
                r#"
  ____    _    ____ _____
 / ___|  / \  / ___| ____|
 \___ \ / _ \| |  _|  _|
  ___) / ___ \ |_| | |___
 |____/_/   \_\____|_____|

   School Assistant Grounded Engine v{}
"#,
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark.
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message.
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message.
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print an assistant answer.
    pub fn answer(&self, message: &str) {
        if self.colored {
            println!("{} {}", "sage>".bright_cyan().bold(), message);
        } else {
            println!("sage> {}", message);
        }
    }

    /// Print a file creation message.
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!("  {} {} {}", "+".green().bold(), file_type.dimmed(), path);
        } else {
            println!("  [NEW] {} {}", file_type, path);
        }
    }
}
