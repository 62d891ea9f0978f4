/*!
 * # papertrans
 *
 * Translation-backend abstraction and cancellable job execution for PDF
 * document translation.
 *
 * ## Features
 *
 * - One uniform translation contract over 8 heterogeneous services:
 *   - Google, Bing (public web endpoints)
 *   - DeepL, DeepLX (API key / self-hosted relay)
 *   - Azure, Tencent, Baidu (cloud credentials, signed requests)
 *   - Argos Translate (offline local models)
 * - Per-service credential schemas and language-code remapping
 * - Per-instance caching of repeated segments
 * - Cancellable document-translation jobs with progress relay
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `registry`: static service table and translator construction
 * - `translators`: the shared contract and the backend adapters
 * - `cache`: translation caching
 * - `credentials`: credential-store interface
 * - `job`: cancellation token, progress/result sinks, job state machine
 * - `pipeline`: interface to the external document pipeline
 * - `language_utils`: language remapping and output sanitizing
 * - `page_utils`: page-selection parsing
 * - `errors`: custom error types for the crate
 *
 * The document pipeline itself (text extraction, segmentation, reflow) and
 * the front end are external collaborators; this crate only defines their
 * interfaces.
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod cache;
pub mod credentials;
pub mod errors;
pub mod job;
pub mod language_utils;
pub mod page_utils;
pub mod pipeline;
pub mod registry;
pub mod translators;

// Re-export main types for easier usage
pub use cache::TranslationCache;
pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use errors::{ErrorClass, PageSelectionError, PipelineError, TranslatorError};
pub use job::{
    CancelState, CancellationToken, JobRequest, JobRunner, JobState, ProgressSink, ResultSink,
    TranslationJob,
};
pub use page_utils::parse_page_selection;
pub use pipeline::{DocumentPipeline, LayoutModel, PipelineRequest, ProgressFn};
pub use registry::{
    build_translator, lookup, resolve_service, ServiceDescriptor, ServiceKind, TranslatorOptions,
};
pub use translators::{TranslationBackend, Translator};
