use crate::notify::offset::NotificationOffset;
use crate::notify::template::NotificationTemplate;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Key under which the user's default notification template is kept.
pub const DEFAULT_TEMPLATE_KEY: &str = "defaultNotificationTemplate";

/// String key-value storage for UI preferences.
pub trait TemplateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl TemplateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            anyhow::bail!("Invalid store key: {:?}", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl TemplateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let value = std::fs::read_to_string(&path)
            .context(format!("Failed to read {:?}", path))?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)
            .context(format!("Failed to create store directory {:?}", self.dir))?;
        std::fs::write(&path, value).context(format!("Failed to write {:?}", path))?;
        Ok(())
    }
}

/// The stored default template, or `[-1d, 0m, +1d]` if none was saved.
pub fn load_default_template<S: TemplateStore + ?Sized>(
    store: &S,
    max_notifications: usize,
) -> Result<NotificationTemplate> {
    let Some(raw) = store.get(DEFAULT_TEMPLATE_KEY)? else {
        tracing::debug!("no saved default template, using built-in");
        let builtin = NotificationTemplate::default().into_offsets();
        return Ok(NotificationTemplate::new(builtin, max_notifications));
    };
    let offsets: Vec<NotificationOffset> =
        serde_json::from_str(&raw).context("Failed to parse saved default template")?;
    NotificationTemplate::try_new(offsets, max_notifications)
        .context("Saved default template is invalid")
}

pub fn save_default_template<S: TemplateStore + ?Sized>(
    store: &mut S,
    template: &NotificationTemplate,
) -> Result<()> {
    let raw = serde_json::to_string(template.offsets())?;
    store.set(DEFAULT_TEMPLATE_KEY, &raw)?;
    tracing::info!(count = template.len(), "default template saved");
    Ok(())
}
