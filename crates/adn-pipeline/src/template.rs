//! Template rendering
//!
//! Templates are Markdown files with `{{ variable }}` placeholders and an
//! optional filter: `{{ title | yaml }}` quotes the value as a YAML scalar,
//! `{{ abstract | indent }}` indents every line for a YAML block scalar.
//! Referring to a variable the record does not provide is an error, so a typo
//! in a template never produces a silently blank field.
//!
//! Templates are looked up as `<name>.md` in the templates directory first and
//! then among the built-in templates ([`DEFAULT_TEMPLATE`],
//! [`CSV_TEMPLATE`]).

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use adn_core::Document;
use chrono::{DateTime, Local};
use regex::Regex;

use crate::error::{RenderError, RenderResult};
use crate::record::RawRecord;

pub const DEFAULT_TEMPLATE: &str = "default";
pub const CSV_TEMPLATE: &str = "csv_record";

const DEFAULT_TEMPLATE_BODY: &str = r#"---
title: {{ file_stem | yaml }}
source: {{ file_name | yaml }}
first_decision: {{ first_decision | yaml }}
second_decision: {{ second_decision | yaml }}
estado: {{ estado }}
tags:
{{ tags }}
---

# {{ file_stem }} extracción

## Metadatos
- **Archivo fuente**: {{ file_name }}
- **Fecha de creación**: {{ date }}
- **Generado por**: ADN v{{ version }}
- **Tamaño del archivo**: {{ file_size }}

## Resumen ejecutivo
[Espacio para resumen]

## Puntos clave
-
-
-

## Citas importantes
>

## Notas adicionales
[Espacio para notas]

## Referencias
[Espacio para referencias]

## Estructura del documento
- [ ] Introducción revisada
- [ ] Metodología analizada
- [ ] Resultados extraídos
- [ ] Conclusiones resumidas

---
**annotation-target**: {{ file_name }}
**generated**: {{ generated_at }}
"#;

const CSV_TEMPLATE_BODY: &str = r#"---
source: {{ source | yaml }}
doi: {{ doi | yaml }}
title: {{ title | yaml }}
abstract: |
{{ abstract | indent }}
first_decision: {{ first_decision | yaml }}
second_decision: {{ second_decision | yaml }}
estado: {{ estado }}
tags:
{{ tags }}
---
"#;

/// Built-in template source by name
pub fn builtin_template(name: &str) -> Option<&'static str> {
    match name {
        DEFAULT_TEMPLATE => Some(DEFAULT_TEMPLATE_BODY),
        CSV_TEMPLATE => Some(CSV_TEMPLATE_BODY),
        _ => None,
    }
}

/// Variables available to a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    vars: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record fields plus the review state of `document` and generation
    /// metadata.
    pub fn for_record(
        record: &RawRecord,
        document: &Document,
        generated_at: &DateTime<Local>,
        date_format: &str,
    ) -> Self {
        let mut context = Self::new();
        for (key, value) in &record.fields {
            context.insert(key, value);
        }
        context.insert("first_decision", document.first_decision().as_token());
        context.insert("second_decision", document.second_decision().as_token());
        context.insert("estado", document.stage().as_token());
        context.insert("tags", document.tags().to_yaml_list());
        context.insert("date", generated_at.format(date_format).to_string());
        context.insert("generated_at", generated_at.to_rfc3339());
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Renders a named template against a context
pub trait TemplateRenderer: Send + Sync {
    fn has_template(&self, name: &str) -> bool;

    fn render(&self, name: &str, context: &TemplateContext) -> RenderResult<String>;
}

/// File-backed template engine with built-in fallbacks
#[derive(Debug, Default)]
pub struct TemplateEngine {
    templates_dir: Option<PathBuf>,
    cache: Mutex<HashMap<String, Arc<str>>>,
}

impl TemplateEngine {
    pub fn new(templates_dir: Option<PathBuf>) -> Self {
        Self {
            templates_dir,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Engine with only the built-in templates
    pub fn builtin() -> Self {
        Self::new(None)
    }

    fn template_file(&self, name: &str) -> Option<PathBuf> {
        self.templates_dir
            .as_ref()
            .map(|dir| dir.join(format!("{name}.md")))
            .filter(|path| path.is_file())
    }

    /// Template source, loaded once per engine
    pub fn source(&self, name: &str) -> RenderResult<Arc<str>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(source) = cache.get(name) {
            return Ok(source.clone());
        }

        let source: Arc<str> = match self.template_file(name) {
            Some(path) => {
                tracing::debug!("Loading template '{}' from {}", name, path.display());
                std::fs::read_to_string(&path)
                    .map_err(|e| RenderError::Unreadable {
                        template: name.to_string(),
                        message: e.to_string(),
                    })?
                    .into()
            }
            None => builtin_template(name)
                .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))?
                .into(),
        };

        cache.insert(name.to_string(), source.clone());
        Ok(source)
    }
}

impl TemplateRenderer for TemplateEngine {
    fn has_template(&self, name: &str) -> bool {
        self.template_file(name).is_some() || builtin_template(name).is_some()
    }

    fn render(&self, name: &str, context: &TemplateContext) -> RenderResult<String> {
        let source = self.source(name)?;
        render_str(name, &source, context)
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\|\s*([A-Za-z_]+)\s*)?\}\}")
            .unwrap_or_else(|e| unreachable!("placeholder pattern is valid: {e}"))
    })
}

/// Substitute every placeholder in `source`.
pub fn render_str(name: &str, source: &str, context: &TemplateContext) -> RenderResult<String> {
    let mut out = String::with_capacity(source.len());
    let mut last = 0;

    for caps in placeholder().captures_iter(source) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        let variable = &caps[1];
        let value = context
            .get(variable)
            .ok_or_else(|| RenderError::UnknownVariable {
                template: name.to_string(),
                variable: variable.to_string(),
            })?;

        let rendered = match caps.get(2).map(|m| m.as_str()) {
            None => value.to_string(),
            Some("yaml") => yaml_scalar(value),
            Some("indent") => indent_block(value),
            Some(other) => {
                return Err(RenderError::UnknownFilter {
                    template: name.to_string(),
                    filter: other.to_string(),
                })
            }
        };

        out.push_str(&source[last..whole.start]);
        out.push_str(&rendered);
        last = whole.end;
    }

    out.push_str(&source[last..]);
    Ok(out)
}

/// Quote a value as a YAML scalar (`''` for empty text).
pub fn yaml_scalar(value: &str) -> String {
    match serde_yaml::to_string(value) {
        Ok(yaml) => yaml.trim_end_matches('\n').to_string(),
        Err(_) => format!("'{}'", value.replace('\'', "''")),
    }
}

/// Indent every line by two spaces for use inside a `|` block scalar.
pub fn indent_block(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return "  ".to_string();
    }
    value
        .lines()
        .map(|line| {
            let line = line.trim();
            if line.is_empty() {
                "  ".to_string()
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
