//! The study catalog: categories of word lists, each list offering modes.
//!
//! The document is parsed once and flattened into a [`CatalogIndex`] so that
//! lists and categories are found by id without walking the tree.

use rustc_hash::FxHashMap;

use crate::{Capabilities, ConfigError, ModeConfig, ModeType};

pub const DEFAULT_SITE_TITLE: &str = "單字卡練習";

fn enabled_by_default() -> bool {
    true
}

#[derive(
    Clone, Debug, serde::Serialize, serde::Deserialize, tsify::Tsify, schemars::JsonSchema,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct ConfigDocument {
    #[serde(rename = "siteTitle", default, skip_serializing_if = "Option::is_none")]
    pub site_title: Option<String>,
    pub catalog: Vec<CatalogItem>,
}

impl ConfigDocument {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn site_title(&self) -> &str {
        self.site_title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_SITE_TITLE)
    }
}

#[derive(
    Clone, Debug, serde::Serialize, serde::Deserialize, tsify::Tsify, schemars::JsonSchema,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogItem {
    Category(Category),
    List(WordList),
}

#[derive(
    Clone, Debug, serde::Serialize, serde::Deserialize, tsify::Tsify, schemars::JsonSchema,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

#[derive(
    Clone, Debug, serde::Serialize, serde::Deserialize, tsify::Tsify, schemars::JsonSchema,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct WordList {
    pub id: String,
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Path of the word file relative to the site root. Defaults to `words/<id>.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub modes: Vec<ModeConfig>,
}

impl WordList {
    pub fn word_file(&self) -> String {
        self.file
            .clone()
            .unwrap_or_else(|| format!("words/{}.json", self.id))
    }

    pub fn mode(&self, mode_id: &str) -> Option<&ModeConfig> {
        self.modes.iter().find(|mode| mode.id == mode_id)
    }
}

#[derive(Clone, Debug)]
struct IndexedCategory {
    category: Category,
    parent: Option<String>,
}

#[derive(Clone, Debug)]
pub struct IndexedList {
    pub list: WordList,
    /// Ids of the enclosing categories, outermost first.
    pub path: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct CatalogIndex {
    site_title: String,
    root: Vec<CatalogItem>,
    categories: FxHashMap<String, IndexedCategory>,
    lists: FxHashMap<String, IndexedList>,
}

impl CatalogIndex {
    pub fn build(document: &ConfigDocument) -> Result<Self, ConfigError> {
        let mut index = Self {
            site_title: document.site_title().to_string(),
            root: document.catalog.clone(),
            categories: FxHashMap::default(),
            lists: FxHashMap::default(),
        };
        let mut path = Vec::new();
        index.add_items(&document.catalog, &mut path)?;
        log::info!(
            "Indexed catalog with {} categories and {} lists",
            index.categories.len(),
            index.lists.len()
        );
        Ok(index)
    }

    fn add_items(
        &mut self,
        items: &[CatalogItem],
        path: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        for item in items {
            match item {
                CatalogItem::Category(category) => {
                    let indexed = IndexedCategory {
                        category: category.clone(),
                        parent: path.last().cloned(),
                    };
                    if self
                        .categories
                        .insert(category.id.clone(), indexed)
                        .is_some()
                    {
                        return Err(ConfigError::DuplicateId(category.id.clone()));
                    }
                    path.push(category.id.clone());
                    self.add_items(&category.items, path)?;
                    path.pop();
                }
                CatalogItem::List(list) => {
                    let indexed = IndexedList {
                        list: list.clone(),
                        path: path.clone(),
                    };
                    if self.lists.insert(list.id.clone(), indexed).is_some() {
                        return Err(ConfigError::DuplicateId(list.id.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn site_title(&self) -> &str {
        &self.site_title
    }

    pub fn list(&self, list_id: &str) -> Result<&IndexedList, ConfigError> {
        self.lists
            .get(list_id)
            .ok_or_else(|| ConfigError::UnknownList(list_id.to_string()))
    }

    pub fn lists(&self) -> impl Iterator<Item = &IndexedList> {
        self.lists.values()
    }

    /// Looks up an enabled mode of a list.
    pub fn mode(&self, list_id: &str, mode_id: &str) -> Result<&ModeConfig, ConfigError> {
        let mode = self
            .list(list_id)?
            .list
            .mode(mode_id)
            .ok_or_else(|| ConfigError::UnknownMode {
                list_id: list_id.to_string(),
                mode_id: mode_id.to_string(),
            })?;
        if !mode.enabled {
            return Err(ConfigError::ModeDisabled {
                list_id: list_id.to_string(),
                mode_id: mode_id.to_string(),
            });
        }
        Ok(mode)
    }

    /// Builds the menu for a location hash such as `#reader/lesson17`.
    ///
    /// Segments that do not name a child category of the current level are skipped.
    pub fn navigate(&self, hash: &str) -> MenuView {
        let mut current: Option<&Category> = None;
        let mut breadcrumbs = Vec::new();
        let mut trail: Vec<&str> = Vec::new();

        for segment in hash.trim_start_matches('#').split('/') {
            if segment.is_empty() {
                continue;
            }
            let Some(indexed) = self.categories.get(segment) else {
                continue;
            };
            if !indexed.category.enabled {
                continue;
            }
            let current_id = current.map(|category| category.id.as_str());
            if indexed.parent.as_deref() != current_id {
                continue;
            }
            trail.push(&indexed.category.id);
            breadcrumbs.push(Breadcrumb {
                name: indexed.category.name.clone(),
                hash: format!("#{}", trail.join("/")),
            });
            current = Some(&indexed.category);
        }

        let items = current
            .map(|category| category.items.as_slice())
            .unwrap_or(self.root.as_slice());

        let entries: Vec<MenuEntry> = items
            .iter()
            .filter_map(|item| match item {
                CatalogItem::Category(category) if category.enabled => {
                    let mut child_trail = trail.clone();
                    child_trail.push(&category.id);
                    Some(MenuEntry::Category {
                        id: category.id.clone(),
                        name: category.name.clone(),
                        hash: format!("#{}", child_trail.join("/")),
                    })
                }
                CatalogItem::List(list) if list.enabled => Some(MenuEntry::List {
                    id: list.id.clone(),
                    name: list.name.clone(),
                    modes: list
                        .modes
                        .iter()
                        .filter(|mode| mode.enabled)
                        .map(|mode| ModeButton {
                            id: mode.id.clone(),
                            name: mode.display_name.clone(),
                            mode_type: mode.mode_type,
                            capabilities: mode.capabilities(),
                        })
                        .collect(),
                }),
                _ => None,
            })
            .collect();

        let shows_exam_toggle = entries
            .iter()
            .any(|entry| matches!(entry, MenuEntry::List { .. }));

        MenuView {
            title: current
                .map(|category| category.name.clone())
                .unwrap_or_else(|| self.site_title.clone()),
            breadcrumbs,
            entries,
            shows_exam_toggle,
        }
    }
}

/// One level of the menu, ready to render.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    pub title: String,
    /// The categories leading to this level, outermost first. The home link is not included.
    pub breadcrumbs: Vec<Breadcrumb>,
    pub entries: Vec<MenuEntry>,
    /// The exam checkbox only makes sense where modes can be picked.
    pub shows_exam_toggle: bool,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Breadcrumb {
    pub name: String,
    pub hash: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MenuEntry {
    Category {
        id: String,
        name: String,
        hash: String,
    },
    List {
        id: String,
        name: String,
        modes: Vec<ModeButton>,
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ModeButton {
    pub id: String,
    pub name: String,
    pub mode_type: ModeType,
    pub capabilities: Capabilities,
}
