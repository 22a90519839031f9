pub mod cashback;
pub mod report;
pub mod setup;
pub mod spending;
pub mod ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}
