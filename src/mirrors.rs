//! Static registry of Gradle distribution mirrors.

use crate::types::Edition;

/// Placeholder substituted with the requested version in a URL template.
pub const VERSION_TOKEN: &str = "{version}";

/// A single mirror endpoint for one edition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEntry {
    /// Human-readable name, used only for reporting.
    pub label: String,
    /// URL containing [`VERSION_TOKEN`] exactly once.
    pub url_template: String,
    /// Edition served by this entry.
    pub edition: Edition,
}

impl MirrorEntry {
    pub fn new(label: &str, url_template: &str, edition: Edition) -> Self {
        Self {
            label: label.to_string(),
            url_template: url_template.to_string(),
            edition,
        }
    }

    /// Substitutes `version` into the URL template.
    pub fn url_for(&self, version: &str) -> String {
        self.url_template.replace(VERSION_TOKEN, version)
    }
}

/// Ordered list of mirrors. Earlier entries are preferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRegistry {
    entries: Vec<MirrorEntry>,
}

impl MirrorRegistry {
    pub fn new(entries: Vec<MirrorEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MirrorEntry] {
        &self.entries
    }

    /// Entries serving `edition`, in registry order.
    pub fn eligible(&self, edition: Edition) -> impl Iterator<Item = &MirrorEntry> + '_ {
        self.entries.iter().filter(move |m| m.edition == edition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MirrorRegistry {
    /// Three regional providers, each serving both editions.
    fn default() -> Self {
        const PROVIDERS: [(&str, &str); 3] = [
            ("Tencent Cloud", "https://mirrors.cloud.tencent.com/gradle"),
            ("Huawei Cloud", "https://mirrors.huaweicloud.com/gradle"),
            ("Tsinghua TUNA", "https://mirrors.tuna.tsinghua.edu.cn/gradle"),
        ];

        let entries = PROVIDERS
            .iter()
            .flat_map(|(name, base)| {
                [Edition::Bin, Edition::All].into_iter().map(move |edition| {
                    MirrorEntry::new(
                        &format!("{}-{}", name, edition),
                        &format!("{}/gradle-{}-{}.zip", base, VERSION_TOKEN, edition),
                        edition,
                    )
                })
            })
            .collect();

        Self { entries }
    }
}
