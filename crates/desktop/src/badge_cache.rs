use badgewatch_core::{badge_file_name, BadgewatchError, Result};
use eframe::egui;
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

pub const BASE_BADGE_URL: &str = "https://media.retroachievements.org/Badge/";

/// Where badge image bytes come from
pub trait BadgeSource: Send + Sync {
    fn fetch(&self, file_name: &str) -> Result<Vec<u8>>;
}

pub struct HttpBadgeSource {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpBadgeSource {
    pub fn new() -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: BASE_BADGE_URL.to_string(),
        }
    }
}

impl Default for HttpBadgeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl BadgeSource for HttpBadgeSource {
    fn fetch(&self, file_name: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, file_name);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| BadgewatchError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(BadgewatchError::Network(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .map_err(|e| BadgewatchError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

struct FetchedBadge {
    key: String,
    result: Result<egui::ColorImage>,
}

/// Badge textures keyed by file name (`<badge>.png` or `<badge>_lock.png`).
///
/// Misses are fetched on a background thread; entries are never evicted and
/// failures are not cached. A key that keeps failing is only warned about once.
pub struct BadgeCache {
    source: Arc<dyn BadgeSource>,
    textures: HashMap<String, egui::TextureHandle>,
    /// Keys currently being downloaded (to avoid duplicate downloads)
    downloading: HashSet<String>,
    /// Keys whose last download failed
    failed: HashSet<String>,
    tx: Sender<FetchedBadge>,
    rx: Receiver<FetchedBadge>,
}

impl BadgeCache {
    pub fn new(source: Arc<dyn BadgeSource>) -> Self {
        let (tx, rx) = channel();
        Self {
            source,
            textures: HashMap::new(),
            downloading: HashSet::new(),
            failed: HashSet::new(),
            tx,
            rx,
        }
    }

    /// Cached texture for the badge variant, or `None` while it is being fetched
    pub fn get(&mut self, ctx: &egui::Context, name: &str, earned: bool) -> Option<egui::TextureHandle> {
        let key = badge_file_name(name, earned);
        if let Some(texture) = self.textures.get(&key) {
            return Some(texture.clone());
        }
        self.trigger_download(ctx, key);
        None
    }

    fn trigger_download(&mut self, ctx: &egui::Context, key: String) {
        if !self.downloading.insert(key.clone()) {
            return;
        }

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = source.fetch(&key).and_then(|bytes| decode_badge(&bytes));
            let _ = tx.send(FetchedBadge { key, result });
            ctx.request_repaint();
        });
    }

    /// Moves finished downloads into the cache; call once per frame
    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok(fetched) = self.rx.try_recv() {
            self.downloading.remove(&fetched.key);
            match fetched.result {
                Ok(image) => {
                    self.failed.remove(&fetched.key);
                    let texture = ctx.load_texture(&fetched.key, image, egui::TextureOptions::NEAREST);
                    self.textures.insert(fetched.key, texture);
                }
                Err(e) => {
                    if self.failed.insert(fetched.key.clone()) {
                        tracing::warn!("Failed to load badge {}: {}", fetched.key, e);
                    } else {
                        tracing::debug!("Badge {} still failing: {}", fetched.key, e);
                    }
                }
            }
        }
    }

}

#[cfg(test)]
impl BadgeCache {
    fn len(&self) -> usize {
        self.textures.len()
    }

    fn is_downloading(&self, name: &str, earned: bool) -> bool {
        self.downloading.contains(&badge_file_name(name, earned))
    }

    fn has_failed(&self, name: &str, earned: bool) -> bool {
        self.failed.contains(&badge_file_name(name, earned))
    }
}

/// Decodes PNG (or JPEG) bytes into an RGBA image egui can upload
pub fn decode_badge(bytes: &[u8]) -> Result<egui::ColorImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| BadgewatchError::Decode(e.to_string()))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}
