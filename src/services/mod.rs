pub mod applier;
pub mod export;
pub mod generator;
pub mod matcher;
pub mod scanner;
pub mod selection;

pub use applier::{ApplySummary, DescriptionApplier};
pub use generator::{Delay, DescriptionGenerator, GenerationSummary, TokioDelay};
pub use matcher::ResultMatcher;
pub use scanner::{NodeScanner, ScanScope};
pub use selection::SelectionSet;
