//! Macros for error/warning printing

/// Expand to an error message
#[macro_export]
macro_rules! panelx_error {
    ($($err:tt)*) => ({
        use colored::Colorize;
        eprintln!("{}: {}", "[panelx error]".red().bold(), format!($($err)*));
    })
}

/// Expand to an info message
#[macro_export]
macro_rules! panelx_info {
    ($($err:tt)*) => ({
        use colored::Colorize;
        eprintln!("{}: {}", "[panelx info]".purple().bold(), format!($($err)*));
    })
}

/// Expand to a fatal message
#[macro_export]
macro_rules! panelx_fatal {
    ($($err:tt)*) => ({
        use colored::Colorize;
        eprintln!("{}: {}", "[panelx fatal]".yellow().bold(), format!($($err)*));
        std::process::exit(1);
    })
}
