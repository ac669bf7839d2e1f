// crates/survey-form-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for English and Spanish output.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The survey form CLI stores user-facing strings in a small translation
//! catalog. All runtime output, prompts, and notifications go through the
//! [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Spanish.
    Es,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Es];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates.
    pub key: &'static str,
    /// The formatted value substituted for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "survey-form {version}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'es'."),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("input.kind.submission", "submission input"),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.parse_failed", "Failed to parse JSON {kind} at {path}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("serve.init_failed", "Failed to initialize survey form server: {error}"),
    ("serve.failed", "Survey form server failed: {error}"),
    ("serve.listening", "survey-form listening on http://{bind}"),
    ("serve.bind.parse_failed", "Invalid bind address '{bind}': {error}"),
    (
        "serve.bind.allow_env_invalid",
        "Invalid value for {env}: {value}. Expected true/false/1/0/yes/no/on/off.",
    ),
    (
        "serve.bind.non_loopback_opt_in",
        "Refusing to bind to non-loopback address {bind}. Pass --allow-non-loopback or set \
         {env}=1 to expose the form endpoint.",
    ),
    (
        "serve.warn.network.header",
        "WARNING: the survey form endpoint is reachable from the network.",
    ),
    ("serve.warn.network.bind", "- Bind: {bind}"),
    ("serve.warn.network.forwarded", "- X-Forwarded-For trusted for rate limiting: {status}"),
    ("serve.warn.network.audit", "- Audit logging: {status}"),
    ("serve.warn.network.enabled", "enabled"),
    ("serve.warn.network.disabled", "disabled"),
    ("client.init_failed", "Failed to initialize form client: {error}"),
    ("client.endpoint_invalid", "Invalid endpoint '{endpoint}': {error}"),
    ("submit.invalid.header", "The submission is invalid:"),
    ("submit.invalid.field", "- {field}: {message}"),
    ("submit.invalid.form", "- {message}"),
    ("notify.success.title", "Success"),
    ("notify.success.description", "Form data submitted successfully."),
    ("notify.error.title", "Error"),
    ("notify.error.invalid", "Invalid request data passed"),
    ("notify.error.rate_limited", "Rate limited"),
    ("notify.error.status", "Request failed with status code {status}"),
    ("notify.line", "{title}: {description}"),
    ("form.title", "Networks - Security - Form"),
    ("form.field.name", "Name"),
    ("form.field.email", "Email"),
    ("form.field.age", "Age"),
    ("form.field.phone_number", "Phone Number"),
    ("form.field.occupation", "Occupation"),
    ("form.field.hobby", "Hobby"),
    ("form.field.preferred_contact_method", "Preferred Contact Method"),
    ("form.field.feedback", "Feedback"),
    ("form.contact.email", "Email"),
    ("form.contact.phone", "Phone"),
    ("fill.age.not_number", "Age must be a number"),
    ("fill.prompt_failed", "Prompt failed: {error}"),
];

/// Spanish catalog entries.
const CATALOG_ES: &[(&str, &str)] = &[
    ("main.version", "survey-form {version}"),
    ("i18n.lang.invalid_env", "Valor no válido para {env}: {value}. Se esperaba 'en' o 'es'."),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "salida"),
    ("output.write_failed", "No se pudo escribir en {stream}: {error}"),
    ("input.kind.submission", "entrada del formulario"),
    ("input.read_failed", "No se pudo leer {kind} en {path}: {error}"),
    (
        "input.read_too_large",
        "Se rechaza leer {kind} en {path} porque ocupa {size} bytes (límite {limit}).",
    ),
    ("input.parse_failed", "No se pudo analizar el JSON de {kind} en {path}: {error}"),
    ("config.load_failed", "No se pudo cargar la configuración: {error}"),
    ("config.validate.ok", "Configuración válida."),
    ("serve.init_failed", "No se pudo iniciar el servidor del formulario: {error}"),
    ("serve.failed", "El servidor del formulario falló: {error}"),
    ("serve.listening", "survey-form escuchando en http://{bind}"),
    ("serve.bind.parse_failed", "Dirección de enlace no válida '{bind}': {error}"),
    (
        "serve.bind.allow_env_invalid",
        "Valor no válido para {env}: {value}. Se esperaba true/false/1/0/yes/no/on/off.",
    ),
    (
        "serve.bind.non_loopback_opt_in",
        "Se rechaza enlazar a la dirección no local {bind}. Use --allow-non-loopback o defina \
         {env}=1 para exponer el formulario.",
    ),
    ("serve.warn.network.header", "AVISO: el formulario es accesible desde la red."),
    ("serve.warn.network.bind", "- Enlace: {bind}"),
    (
        "serve.warn.network.forwarded",
        "- X-Forwarded-For de confianza para el límite de solicitudes: {status}",
    ),
    ("serve.warn.network.audit", "- Registro de auditoría: {status}"),
    ("serve.warn.network.enabled", "activado"),
    ("serve.warn.network.disabled", "desactivado"),
    ("client.init_failed", "No se pudo iniciar el cliente del formulario: {error}"),
    ("client.endpoint_invalid", "Endpoint no válido '{endpoint}': {error}"),
    ("submit.invalid.header", "El formulario no es válido:"),
    ("submit.invalid.field", "- {field}: {message}"),
    ("submit.invalid.form", "- {message}"),
    ("notify.success.title", "Éxito"),
    ("notify.success.description", "Datos del formulario enviados correctamente."),
    ("notify.error.title", "Error"),
    ("notify.error.invalid", "Datos de la solicitud no válidos"),
    ("notify.error.rate_limited", "Demasiadas solicitudes"),
    ("notify.error.status", "La solicitud falló con el código de estado {status}"),
    ("notify.line", "{title}: {description}"),
    ("form.title", "Redes - Seguridad - Forma"),
    ("form.field.name", "Nombre"),
    ("form.field.email", "Correo electrónico"),
    ("form.field.age", "Edad"),
    ("form.field.phone_number", "Número de teléfono"),
    ("form.field.occupation", "Ocupación"),
    ("form.field.hobby", "Pasatiempo"),
    ("form.field.preferred_contact_method", "Método de contacto preferido"),
    ("form.field.feedback", "Comentarios"),
    ("form.contact.email", "Correo"),
    ("form.contact.phone", "Teléfono"),
    ("fill.age.not_number", "La edad debe ser un número"),
    ("fill.prompt_failed", "Falló la entrada interactiva: {error}"),
];

/// Returns the raw catalog entries for the requested locale.
#[cfg(test)]
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Es => CATALOG_ES,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_ES_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Es => CATALOG_ES_MAP.get_or_init(|| CATALOG_ES.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_for(current_locale(), key, args)
}

/// Translates `key` for an explicit locale.
#[must_use]
pub fn translate_for(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
