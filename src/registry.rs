/*!
 * Static registry of the supported translation services.
 *
 * Maps each human-readable service name to a descriptor carrying the adapter
 * kind, the credential schema, and the backend's language remap table.
 * Lookup of an unknown name is a configuration error raised synchronously at
 * job setup, before any credential access or network activity.
 */

use std::collections::HashMap;

use crate::credentials::CredentialStore;
use crate::errors::TranslatorError;
use crate::language_utils::remap_language;
use crate::translators::argos::{self, ArgosTranslator};
use crate::translators::azure::{self, AzureTranslator};
use crate::translators::baidu::{self, BaiduTranslator};
use crate::translators::bing::BingTranslator;
use crate::translators::deepl::{self, DeepLTranslator};
use crate::translators::deeplx::{self, DeepLXTranslator};
use crate::translators::google::GoogleTranslator;
use crate::translators::tencent::{self, TencentTranslator};
use crate::translators::{TranslationBackend, Translator};

/// Adapter kind, a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Google,
    Bing,
    DeepL,
    DeepLX,
    Azure,
    Tencent,
    Baidu,
    Argos,
}

/// One credential key in a service's schema
#[derive(Debug, Clone, Copy)]
pub struct CredentialSpec {
    /// Key under which the value is stored and passed to the adapter
    pub key: &'static str,

    /// Whether construction must fail when neither the store nor the
    /// default provides a value
    pub required: bool,

    /// Value used when the store has none
    pub default: Option<&'static str>,
}

/// Descriptor for one registered service
#[derive(Debug)]
pub struct ServiceDescriptor {
    /// Human-readable name shown to users and accepted by [`lookup`]
    pub name: &'static str,

    /// Stable lowercase identifier; scopes credentials and cache keys
    pub backend_id: &'static str,

    /// Which adapter to construct
    pub kind: ServiceKind,

    /// Credential schema applied at resolution time
    pub credentials: &'static [CredentialSpec],

    /// Backend-specific language remaps, identity for unlisted codes
    pub lang_map: &'static [(&'static str, &'static str)],
}

impl ServiceDescriptor {
    /// Remap a language code through this backend's table
    pub fn remap(&self, code: &str) -> String {
        remap_language(self.lang_map, code)
    }
}

/// All registered services, in presentation order
pub static SERVICES: &[ServiceDescriptor] = &[
    ServiceDescriptor {
        name: "Google",
        backend_id: "google",
        kind: ServiceKind::Google,
        credentials: &[],
        lang_map: &[("zh", "zh-CN")],
    },
    ServiceDescriptor {
        name: "Bing",
        backend_id: "bing",
        kind: ServiceKind::Bing,
        credentials: &[],
        lang_map: &[("zh", "zh-Hans")],
    },
    ServiceDescriptor {
        name: "Baidu",
        backend_id: "baidu",
        kind: ServiceKind::Baidu,
        credentials: &[
            CredentialSpec {
                key: baidu::ENV_APP_ID,
                required: true,
                default: None,
            },
            CredentialSpec {
                key: baidu::ENV_SECRET_KEY,
                required: true,
                default: None,
            },
        ],
        lang_map: &[("zh", "zh")],
    },
    ServiceDescriptor {
        name: "DeepL",
        backend_id: "deepl",
        kind: ServiceKind::DeepL,
        credentials: &[
            CredentialSpec {
                key: deepl::ENV_AUTH_KEY,
                required: true,
                default: None,
            },
            CredentialSpec {
                key: deepl::ENV_SERVER_URL,
                required: false,
                default: None,
            },
        ],
        lang_map: &[("zh", "ZH")],
    },
    ServiceDescriptor {
        name: "DeepLX",
        backend_id: "deeplx",
        kind: ServiceKind::DeepLX,
        credentials: &[
            CredentialSpec {
                key: deeplx::ENV_ENDPOINT,
                required: false,
                default: Some(deeplx::DEFAULT_ENDPOINT),
            },
            CredentialSpec {
                key: deeplx::ENV_ACCESS_TOKEN,
                required: false,
                default: None,
            },
        ],
        lang_map: &[("zh", "ZH")],
    },
    ServiceDescriptor {
        name: "Azure",
        backend_id: "azure",
        kind: ServiceKind::Azure,
        credentials: &[
            CredentialSpec {
                key: azure::ENV_ENDPOINT,
                required: true,
                default: Some(azure::DEFAULT_ENDPOINT),
            },
            CredentialSpec {
                key: azure::ENV_API_KEY,
                required: true,
                default: None,
            },
            CredentialSpec {
                key: azure::ENV_REGION,
                required: true,
                default: None,
            },
        ],
        lang_map: &[("zh", "zh-Hans")],
    },
    ServiceDescriptor {
        name: "Tencent",
        backend_id: "tencent",
        kind: ServiceKind::Tencent,
        credentials: &[
            CredentialSpec {
                key: tencent::ENV_SECRET_ID,
                required: true,
                default: None,
            },
            CredentialSpec {
                key: tencent::ENV_SECRET_KEY,
                required: true,
                default: None,
            },
            CredentialSpec {
                key: tencent::ENV_REGION,
                required: false,
                default: Some(tencent::DEFAULT_REGION),
            },
        ],
        lang_map: &[],
    },
    ServiceDescriptor {
        name: "Argos Translate",
        backend_id: "argos",
        kind: ServiceKind::Argos,
        credentials: &[CredentialSpec {
            key: argos::ENV_PACKAGES_DIR,
            required: false,
            default: None,
        }],
        lang_map: &[],
    },
];

/// Names of all registered services, for presentation
pub fn service_names() -> Vec<&'static str> {
    SERVICES.iter().map(|s| s.name).collect()
}

/// Resolve a service name to its descriptor
pub fn lookup(name: &str) -> Result<&'static ServiceDescriptor, TranslatorError> {
    SERVICES
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| TranslatorError::UnknownService(name.to_string()))
}

/// A service descriptor together with its resolved credentials
#[derive(Debug)]
pub struct ResolvedService {
    /// The registry entry
    pub descriptor: &'static ServiceDescriptor,

    /// Credential map with schema defaults applied
    pub envs: HashMap<String, String>,
}

/// Look up a service and resolve its credentials from the store.
///
/// Every missing required key is reported at once so the caller can prompt
/// for all of them in one round. This is the synchronous job-setup check: it
/// fails before any network activity.
pub fn resolve_service(
    name: &str,
    store: &dyn CredentialStore,
) -> Result<ResolvedService, TranslatorError> {
    let descriptor = lookup(name)?;
    let envs = resolve_credentials(descriptor, store)?;
    Ok(ResolvedService { descriptor, envs })
}

/// Apply a descriptor's credential schema against the store
pub fn resolve_credentials(
    descriptor: &ServiceDescriptor,
    store: &dyn CredentialStore,
) -> Result<HashMap<String, String>, TranslatorError> {
    let mut envs = HashMap::new();
    let mut missing = Vec::new();

    for spec in descriptor.credentials {
        let stored = store
            .get(descriptor.backend_id, spec.key)
            .filter(|v| !v.is_empty());
        match stored.or_else(|| spec.default.map(String::from)) {
            Some(value) => {
                envs.insert(spec.key.to_string(), value);
            }
            None if spec.required => missing.push(spec.key.to_string()),
            None => {}
        }
    }

    if !missing.is_empty() {
        return Err(TranslatorError::MissingCredentials {
            service: descriptor.name.to_string(),
            keys: missing,
        });
    }
    Ok(envs)
}

/// Options common to every translator construction
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    /// Source language code, before the backend remap
    pub lang_in: String,

    /// Target language code, before the backend remap
    pub lang_out: String,

    /// Optional model selection, opaque to the built-in backends
    pub model: Option<String>,

    /// Default cache-bypass flag for the built translator
    pub ignore_cache: bool,
}

impl TranslatorOptions {
    /// Options for one language pair with caching enabled
    pub fn new(lang_in: impl Into<String>, lang_out: impl Into<String>) -> Self {
        Self {
            lang_in: lang_in.into(),
            lang_out: lang_out.into(),
            model: None,
            ignore_cache: false,
        }
    }
}

/// Resolve a service by name and construct its translator.
///
/// Credentials are read from the store once, here; nothing re-reads them
/// mid-job.
pub fn build_translator(
    name: &str,
    options: &TranslatorOptions,
    store: &dyn CredentialStore,
) -> Result<Translator, TranslatorError> {
    let resolved = resolve_service(name, store)?;
    build_with_envs(resolved.descriptor, options, &resolved.envs)
}

/// Construct a translator from a descriptor and pre-resolved credentials.
///
/// The language pair is remapped through the backend table before the
/// adapter sees it, so every request already speaks the backend's dialect.
pub fn build_with_envs(
    descriptor: &'static ServiceDescriptor,
    options: &TranslatorOptions,
    envs: &HashMap<String, String>,
) -> Result<Translator, TranslatorError> {
    let lang_in = descriptor.remap(&options.lang_in);
    let lang_out = descriptor.remap(&options.lang_out);

    let backend: Box<dyn TranslationBackend> = match descriptor.kind {
        ServiceKind::Google => Box::new(GoogleTranslator::new(&lang_in, &lang_out)),
        ServiceKind::Bing => Box::new(BingTranslator::new(&lang_in, &lang_out)),
        ServiceKind::DeepL => Box::new(DeepLTranslator::new(&lang_in, &lang_out, envs)?),
        ServiceKind::DeepLX => Box::new(DeepLXTranslator::new(&lang_in, &lang_out, envs)?),
        ServiceKind::Azure => Box::new(AzureTranslator::new(&lang_in, &lang_out, envs)?),
        ServiceKind::Tencent => Box::new(TencentTranslator::new(&lang_in, &lang_out, envs)?),
        ServiceKind::Baidu => Box::new(BaiduTranslator::new(&lang_in, &lang_out, envs)?),
        ServiceKind::Argos => Box::new(ArgosTranslator::new(&lang_in, &lang_out, envs)?),
    };

    Ok(Translator::new(
        backend,
        lang_in,
        lang_out,
        options.model.clone(),
        options.ignore_cache,
    ))
}
