use std::fmt;

/// Scraping mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    WhatsNew,
    LatestVersions,
    Download,
    Pep,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::WhatsNew,
        Mode::LatestVersions,
        Mode::Download,
        Mode::Pep,
    ];

    /// Name used on the command line and in result file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a finished table is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Rows printed as space separated fields.
    #[default]
    Console,
    /// Aligned table printed to the console.
    Pretty,
    /// CSV file under the results directory.
    File,
}
