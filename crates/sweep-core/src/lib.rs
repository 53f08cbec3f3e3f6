pub mod classify;
pub mod collector;
pub mod config;
pub mod engine;
pub mod observer;
pub mod parser;
pub mod printer;
pub mod report;
pub mod resolver;
pub mod rewrite;
pub mod semantic;

pub use classify::{ClassificationResult, EditAction, EditPlan, UnusedItem, classify};
pub use collector::{Declared, collect};
pub use config::{AnalysisConfig, Config, ConfigError, ConfigResult, RewriteConfig};
pub use engine::{Engine, FileError, FileOutcome};
pub use observer::{NoopObserver, Observer, RecordingObserver, TracingObserver};
pub use parser::{Language, ParseError, Parser, SyntaxTree, parse};
pub use printer::{PrintError, print};
pub use report::{Report, report};
pub use resolver::{UsageSet, resolve};
pub use rewrite::{RewriteAction, RewriteSummary, Rewriter, StructuralEditError};
