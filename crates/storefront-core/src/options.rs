//! Option selection state and the data behind the option picker.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::variant::has_standard_size_options;

/// The shopper's current choice per option name, e.g. `{Size: "M"}`.
///
/// An empty value counts as "not chosen" when computing availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSelection(BTreeMap<String, String>);

impl OptionSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Sets `name` to `value`, replacing any earlier choice for that option.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for OptionSelection
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Values of `option_name` still reachable through an available variant,
/// given the other choices in `selection`.
///
/// A variant contributes its value when it is available for sale and agrees
/// with every other non-empty choice. The current choice for `option_name`
/// itself never narrows the result, so picking `Size: S` still offers `M`.
#[must_use]
pub fn available_values(
    product: &Product,
    option_name: &str,
    selection: &OptionSelection,
) -> BTreeSet<String> {
    product
        .variants
        .iter()
        .filter(|variant| variant.available_for_sale)
        .filter(|variant| {
            selection
                .iter()
                .filter(|(name, value)| *name != option_name && !value.is_empty())
                .all(|(name, value)| variant.has_option(name, value))
        })
        .filter_map(|variant| variant.option_value(option_name))
        .map(str::to_owned)
        .collect()
}

/// One declared option and the state of each of its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionChoices {
    pub name: String,
    pub values: Vec<ValueChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueChoice {
    pub value: String,
    /// Reachable through an available variant given the other choices.
    pub available: bool,
    pub selected: bool,
}

/// What the option picker renders for `product`.
///
/// Empty when the product has no standard size option; the picker is hidden
/// for those products and the first available variant is used instead.
#[must_use]
pub fn option_picker(product: &Product, selection: &OptionSelection) -> Vec<OptionChoices> {
    if !has_standard_size_options(product) {
        return Vec::new();
    }

    product
        .options
        .iter()
        .map(|option| {
            let available = available_values(product, &option.name, selection);
            let chosen = selection.get(&option.name);
            OptionChoices {
                name: option.name.clone(),
                values: option
                    .values
                    .iter()
                    .map(|value| ValueChoice {
                        value: value.clone(),
                        available: available.contains(value),
                        selected: chosen == Some(value.as_str()),
                    })
                    .collect(),
            }
        })
        .collect()
}
