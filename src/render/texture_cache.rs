use crate::errors::RenderError;
use crate::render::backend::{BackendKind, RgbaImage, Texture, TextureId};
use std::collections::HashMap;

struct Entry<H> {
    name: String,
    /// Backend handle; `None` once freed.
    handle: Option<H>,
    width: i32,
    height: i32,
    /// Source bitmap kept for re-uploading after a free.
    image: Option<RgbaImage>,
}

/// Name-keyed texture store shared by the backends.
///
/// `H` is whatever the backend uploads a bitmap into. Uploading is done by
/// the caller-supplied closure so the cache never partially applies: if the
/// upload fails, the cache is left exactly as it was.
pub struct TextureCache<H> {
    backend: BackendKind,
    retain_bitmaps: bool,
    names: HashMap<String, TextureId>,
    entries: HashMap<TextureId, Entry<H>>,
}

impl<H> TextureCache<H> {
    pub fn new(backend: BackendKind, retain_bitmaps: bool) -> Self {
        Self {
            backend,
            retain_bitmaps,
            names: HashMap::new(),
            entries: HashMap::new(),
        }
    }

    fn texture(&self, id: TextureId, entry: &Entry<H>) -> Texture {
        Texture { id, backend: self.backend, width: entry.width, height: entry.height }
    }

    /// Uploads `image` and stores it under `name`, replacing any previous
    /// texture of that name. Handles to the replaced texture go stale.
    pub fn store<F>(&mut self, name: &str, image: &RgbaImage, upload: F) -> Result<Texture, RenderError>
    where
        F: FnOnce(&RgbaImage) -> anyhow::Result<H>,
    {
        let handle = upload(image)?;

        if let Some(old) = self.names.remove(name) {
            log::debug!("replacing texture '{}'", name);
            self.entries.remove(&old);
        }

        let id = TextureId::new();
        let entry = Entry {
            name: name.to_string(),
            handle: Some(handle),
            width: image.width as i32,
            height: image.height as i32,
            image: self.retain_bitmaps.then(|| image.clone()),
        };
        let texture = self.texture(id, &entry);

        self.names.insert(name.to_string(), id);
        self.entries.insert(id, entry);

        Ok(texture)
    }

    /// Returns the texture stored under `name`, re-uploading the retained
    /// bitmap first if the backend handle was freed.
    pub fn load<F>(&mut self, name: &str, upload: F) -> Result<Texture, RenderError>
    where
        F: FnOnce(&RgbaImage) -> anyhow::Result<H>,
    {
        let id = *self
            .names
            .get(name)
            .ok_or_else(|| RenderError::TextureNotFound(name.to_string()))?;
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| RenderError::TextureNotFound(name.to_string()))?;

        if entry.handle.is_none() {
            let image = entry
                .image
                .as_ref()
                .ok_or_else(|| RenderError::TextureNotFound(name.to_string()))?;
            log::debug!("re-uploading freed texture '{}'", name);
            entry.handle = Some(upload(image)?);
        }

        let entry = &self.entries[&id];
        Ok(self.texture(id, entry))
    }

    /// The live backend handle behind `texture`, if it came from this cache
    /// and has not been freed or replaced.
    pub fn handle(&self, texture: &Texture) -> Option<&H> {
        if texture.backend != self.backend {
            return None;
        }
        self.entries.get(&texture.id)?.handle.as_ref()
    }

    /// Releases every backend handle and returns the ids that were live.
    ///
    /// Entries whose bitmap was retained stay loadable; the rest are dropped.
    pub fn free_all(&mut self) -> Vec<TextureId> {
        let mut freed = Vec::new();
        for (id, entry) in self.entries.iter_mut() {
            if entry.handle.take().is_some() {
                freed.push(*id);
            }
        }

        let dropped: Vec<TextureId> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.image.is_none())
            .map(|(id, _)| *id)
            .collect();
        for id in dropped {
            if let Some(entry) = self.entries.remove(&id) {
                self.names.remove(&entry.name);
            }
        }

        freed.sort();
        freed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops everything, bitmaps included.
    pub fn clear(&mut self) {
        self.names.clear();
        self.entries.clear();
    }
}
