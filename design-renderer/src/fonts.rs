//! Font cache for text rendering.
//!
//! Remembers which (family, weight) pairs were acquired and what host font
//! they resolved to, so repeated text nodes sharing a preset trigger at most
//! one host load. A failed acquisition resolves to the default font and is
//! memoized too.

use std::collections::HashMap;

use design_core::{FontFamily, FontWeight};

use crate::error::{RenderError, RenderResult};
use crate::host::{FontName, SceneHost};

/// Result of [`FontCache::acquire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredFont {
    /// Font to bind to the node.
    pub font: FontName,
    /// True when the requested font was unavailable and the default was used.
    pub fallback: bool,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    font: FontName,
    fallback: bool,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default)]
pub struct FontCacheStats {
    /// Acquisitions served from the cache.
    pub hits: u64,
    /// Acquisitions that went to the host.
    pub misses: u64,
    /// Acquisitions that resolved to the default font.
    pub fallbacks: u64,
}

/// Per-(family, weight) font cache.
///
/// Lives as long as the caller wants: one render pass, or a whole plugin
/// session to skip reloads across renders.
#[derive(Debug, Clone)]
pub struct FontCache {
    entries: HashMap<(FontFamily, FontWeight), CacheEntry>,
    default_font: FontName,
    default_loaded: bool,
    stats: FontCacheStats,
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FontCache {
    /// Cache falling back to Inter Regular.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default(font_name(FontFamily::Inter, FontWeight::Regular))
    }

    /// Cache with a custom fallback font.
    #[must_use]
    pub fn with_default(default_font: FontName) -> Self {
        Self {
            entries: HashMap::new(),
            default_font,
            default_loaded: false,
            stats: FontCacheStats::default(),
        }
    }

    /// The fallback font.
    #[must_use]
    pub fn default_font(&self) -> &FontName {
        &self.default_font
    }

    /// Resolve and load the font for a typography preset.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::DefaultFontUnavailable`] only when the requested
    /// font fails and the default font fails too.
    pub async fn acquire<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        family: FontFamily,
        weight: FontWeight,
    ) -> RenderResult<AcquiredFont> {
        if let Some(entry) = self.entries.get(&(family, weight)) {
            self.stats.hits += 1;
            return Ok(AcquiredFont {
                font: entry.font.clone(),
                fallback: entry.fallback,
            });
        }

        self.stats.misses += 1;
        let requested = font_name(family, weight);

        let entry = match host.load_font(&requested).await {
            Ok(()) => {
                if requested == self.default_font {
                    self.default_loaded = true;
                }
                CacheEntry {
                    font: requested,
                    fallback: false,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Font {} not available, falling back to {}: {}",
                    requested,
                    self.default_font,
                    e
                );
                self.stats.fallbacks += 1;
                CacheEntry {
                    font: self.load_default(host).await?,
                    fallback: true,
                }
            }
        };

        let acquired = AcquiredFont {
            font: entry.font.clone(),
            fallback: entry.fallback,
        };
        self.entries.insert((family, weight), entry);
        Ok(acquired)
    }

    async fn load_default<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> RenderResult<FontName> {
        if !self.default_loaded {
            host.load_font(&self.default_font)
                .await
                .map_err(|source| RenderError::DefaultFontUnavailable {
                    font: self.default_font.clone(),
                    source,
                })?;
            self.default_loaded = true;
        }
        Ok(self.default_font.clone())
    }

    /// Load fonts ahead of traversal. Failures are ignored and not cached.
    pub async fn preload<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        fonts: &[(FontFamily, FontWeight)],
    ) {
        for &(family, weight) in fonts {
            if self.entries.contains_key(&(family, weight)) {
                continue;
            }
            let font = font_name(family, weight);
            match host.load_font(&font).await {
                Ok(()) => {
                    if font == self.default_font {
                        self.default_loaded = true;
                    }
                    self.entries.insert(
                        (family, weight),
                        CacheEntry {
                            font,
                            fallback: false,
                        },
                    );
                }
                Err(e) => tracing::debug!("Preload of {} skipped: {}", font, e),
            }
        }
    }

    /// Check if a preset is cached.
    #[must_use]
    pub fn contains(&self, family: FontFamily, weight: FontWeight) -> bool {
        self.entries.contains_key(&(family, weight))
    }

    /// Number of cached presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every cached preset.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.default_loaded = false;
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> &FontCacheStats {
        &self.stats
    }
}

/// Host font name for a preset.
///
/// Inter spells its 600 weight `Semi Bold`; the other families use
/// `SemiBold`.
#[must_use]
pub fn font_name(family: FontFamily, weight: FontWeight) -> FontName {
    let style = match (family, weight) {
        (_, FontWeight::Regular) => "Regular",
        (_, FontWeight::Medium) => "Medium",
        (FontFamily::Inter, FontWeight::Semibold) => "Semi Bold",
        (FontFamily::Roboto | FontFamily::OpenSans | FontFamily::Poppins, FontWeight::Semibold) => {
            "SemiBold"
        }
        (_, FontWeight::Bold) => "Bold",
    };
    FontName::new(family.as_str(), style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn test_font_names() {
        assert_eq!(
            font_name(FontFamily::Inter, FontWeight::Semibold),
            FontName::new("Inter", "Semi Bold")
        );
        assert_eq!(
            font_name(FontFamily::Poppins, FontWeight::Semibold),
            FontName::new("Poppins", "SemiBold")
        );
        assert_eq!(
            font_name(FontFamily::OpenSans, FontWeight::Bold),
            FontName::new("Open Sans", "Bold")
        );
    }

    #[tokio::test]
    async fn test_acquire_is_memoized() {
        let mut host = MemoryHost::new();
        let mut cache = FontCache::new();

        let first = cache
            .acquire(&mut host, FontFamily::Roboto, FontWeight::Bold)
            .await
            .expect("should acquire");
        let second = cache
            .acquire(&mut host, FontFamily::Roboto, FontWeight::Bold)
            .await
            .expect("should acquire");

        assert_eq!(first, second);
        assert!(!first.fallback);
        assert_eq!(host.font_load_count(&FontName::new("Roboto", "Bold")), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_missing_font_falls_back_once() {
        let mut host = MemoryHost::new().with_available_fonts([
            FontName::new("Inter", "Regular"),
            FontName::new("Inter", "Bold"),
        ]);
        let mut cache = FontCache::new();

        let acquired = cache
            .acquire(&mut host, FontFamily::Poppins, FontWeight::Medium)
            .await
            .expect("should fall back");
        assert!(acquired.fallback);
        assert_eq!(acquired.font, FontName::new("Inter", "Regular"));

        let again = cache
            .acquire(&mut host, FontFamily::Poppins, FontWeight::Medium)
            .await
            .expect("cached");
        assert!(again.fallback);
        assert_eq!(host.font_load_count(&FontName::new("Poppins", "Medium")), 1);
        assert_eq!(cache.stats().fallbacks, 1);
    }

    #[tokio::test]
    async fn test_default_font_failure_is_fatal() {
        let mut host = MemoryHost::new().with_available_fonts(Vec::<FontName>::new());
        let mut cache = FontCache::new();

        let err = cache
            .acquire(&mut host, FontFamily::Roboto, FontWeight::Regular)
            .await
            .expect_err("should fail");
        assert!(matches!(err, RenderError::DefaultFontUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_preload_is_best_effort() {
        let mut host = MemoryHost::new().with_available_fonts([FontName::new("Inter", "Regular")]);
        let mut cache = FontCache::new();

        cache
            .preload(
                &mut host,
                &[
                    (FontFamily::Inter, FontWeight::Regular),
                    (FontFamily::Inter, FontWeight::Bold),
                ],
            )
            .await;

        assert!(cache.contains(FontFamily::Inter, FontWeight::Regular));
        assert!(!cache.contains(FontFamily::Inter, FontWeight::Bold));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
