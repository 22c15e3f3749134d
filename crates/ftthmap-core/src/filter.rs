// ── Filter state ──
//
// Four independent dimensions combined by conjunction. Each transition
// consumes the current state and returns the next one, so front-ends hold a
// plain value and re-project after every change.

use serde::{Deserialize, Serialize};

use crate::model::{AddressEntity, ProviderClass};

/// The active filter predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct FilterState {
    pub show_available: bool,
    pub show_unavailable: bool,
    pub show_multi_provider: bool,
    pub show_single_provider: bool,
    /// Exact street name; `None` admits every street.
    pub selected_street: Option<String>,
    /// Exact provider name; `None` admits every provider.
    pub selected_provider: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            show_available: true,
            show_unavailable: true,
            show_multi_provider: true,
            show_single_provider: true,
            selected_street: None,
            selected_provider: None,
        }
    }
}

/// A single filter transition, as dispatched by an input handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    ToggleAvailable,
    ToggleUnavailable,
    ToggleMultiProvider,
    ToggleSingleProvider,
    SelectStreet(String),
    ClearStreet,
    SelectProvider(String),
    ClearProvider,
    Reset,
}

impl FilterState {
    // ── Predicates ───────────────────────────────────────────────────

    pub fn admits_availability(&self, available: bool) -> bool {
        if available {
            self.show_available
        } else {
            self.show_unavailable
        }
    }

    pub fn admits_class(&self, class: ProviderClass) -> bool {
        match class {
            ProviderClass::Multi => self.show_multi_provider,
            ProviderClass::Single => self.show_single_provider,
        }
    }

    pub fn admits_street(&self, street: &str) -> bool {
        self.selected_street.as_deref().is_none_or(|s| s == street)
    }

    pub fn admits_provider(&self, entity: &AddressEntity) -> bool {
        self.selected_provider
            .as_deref()
            .is_none_or(|p| entity.has_provider(p))
    }

    /// All four dimensions admit the entity.
    pub fn admits(&self, entity: &AddressEntity) -> bool {
        self.admits_availability(entity.is_available())
            && self.admits_class(entity.provider_class())
            && self.admits_provider(entity)
            && self.admits_street(&entity.street_name)
    }

    // ── Transitions ──────────────────────────────────────────────────

    pub fn toggle_available(self) -> Self {
        Self {
            show_available: !self.show_available,
            ..self
        }
    }

    pub fn toggle_unavailable(self) -> Self {
        Self {
            show_unavailable: !self.show_unavailable,
            ..self
        }
    }

    pub fn toggle_multi_provider(self) -> Self {
        Self {
            show_multi_provider: !self.show_multi_provider,
            ..self
        }
    }

    pub fn toggle_single_provider(self) -> Self {
        Self {
            show_single_provider: !self.show_single_provider,
            ..self
        }
    }

    /// Replace any previous street selection.
    pub fn select_street(self, street: impl Into<String>) -> Self {
        Self {
            selected_street: Some(street.into()),
            ..self
        }
    }

    pub fn clear_street(self) -> Self {
        Self {
            selected_street: None,
            ..self
        }
    }

    /// Replace any previous provider selection.
    pub fn select_provider(self, provider: impl Into<String>) -> Self {
        Self {
            selected_provider: Some(provider.into()),
            ..self
        }
    }

    pub fn clear_provider(self) -> Self {
        Self {
            selected_provider: None,
            ..self
        }
    }

    pub fn reset(self) -> Self {
        Self::default()
    }

    /// Apply a reified transition.
    pub fn apply(self, action: FilterAction) -> Self {
        match action {
            FilterAction::ToggleAvailable => self.toggle_available(),
            FilterAction::ToggleUnavailable => self.toggle_unavailable(),
            FilterAction::ToggleMultiProvider => self.toggle_multi_provider(),
            FilterAction::ToggleSingleProvider => self.toggle_single_provider(),
            FilterAction::SelectStreet(s) => self.select_street(s),
            FilterAction::ClearStreet => self.clear_street(),
            FilterAction::SelectProvider(p) => self.select_provider(p),
            FilterAction::ClearProvider => self.clear_provider(),
            FilterAction::Reset => self.reset(),
        }
    }

    // ── Display ──────────────────────────────────────────────────────

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// One-line description for status bars, e.g.
    /// `availability: available · providers: all · street: Abay Ave`.
    pub fn describe(&self) -> String {
        let availability = match (self.show_available, self.show_unavailable) {
            (true, true) => "all",
            (true, false) => "available",
            (false, true) => "unavailable",
            (false, false) => "none",
        };
        let class = match (self.show_multi_provider, self.show_single_provider) {
            (true, true) => "all",
            (true, false) => "multi",
            (false, true) => "single",
            (false, false) => "none",
        };
        let mut parts = vec![
            format!("availability: {availability}"),
            format!("providers: {class}"),
        ];
        if let Some(ref street) = self.selected_street {
            parts.push(format!("street: {street}"));
        }
        if let Some(ref provider) = self.selected_provider {
            parts.push(format!("provider: {provider}"));
        }
        parts.join(" · ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoordinateKey, RawRecord};

    fn entity(available: i64, providers: &[&str], street: &str) -> AddressEntity {
        let first = RawRecord {
            street_name: street.into(),
            house: "1".into(),
            latitude: Some("1.0".into()),
            longitude: Some("2.0".into()),
            is_available: available,
            provider: providers[0].into(),
            ..RawRecord::default()
        };
        let mut e = AddressEntity::seed(CoordinateKey::new("1.0", "2.0"), &first);
        for p in &providers[1..] {
            e.observe_provider(p);
        }
        e
    }

    #[test]
    fn default_admits_everything() {
        let f = FilterState::default();
        assert!(f.admits(&entity(1, &["A"], "X")));
        assert!(f.admits(&entity(0, &["A", "B"], "Y")));
        assert!(f.is_default());
    }

    #[test]
    fn availability_dimension() {
        let f = FilterState::default().toggle_available();
        assert!(!f.admits(&entity(1, &["A"], "X")));
        assert!(f.admits(&entity(0, &["A"], "X")));

        let f = FilterState::default().toggle_unavailable();
        assert!(f.admits(&entity(1, &["A"], "X")));
        assert!(!f.admits(&entity(0, &["A"], "X")));
    }

    #[test]
    fn provider_class_dimension() {
        let f = FilterState::default().toggle_multi_provider();
        assert!(!f.admits(&entity(1, &["A", "B"], "X")));
        assert!(f.admits(&entity(1, &["A"], "X")));

        let f = FilterState::default().toggle_single_provider();
        assert!(f.admits(&entity(1, &["A", "B"], "X")));
        assert!(!f.admits(&entity(1, &["A"], "X")));
    }

    #[test]
    fn street_and_provider_are_exact_match() {
        let f = FilterState::default().select_street("Abay Ave");
        assert!(f.admits(&entity(1, &["A"], "Abay Ave")));
        assert!(!f.admits(&entity(1, &["A"], "abay ave")));

        let f = FilterState::default().select_provider("B");
        assert!(f.admits(&entity(1, &["A", "B"], "X")));
        assert!(!f.admits(&entity(1, &["A"], "X")));
    }

    #[test]
    fn selection_replaces_previous_choice() {
        let f = FilterState::default().select_street("One").select_street("Two");
        assert_eq!(f.selected_street.as_deref(), Some("Two"));
        let f = f.select_provider("A").select_provider("B");
        assert_eq!(f.selected_provider.as_deref(), Some("B"));
    }

    #[test]
    fn clearing_restores_admit_all() {
        let f = FilterState::default()
            .select_street("One")
            .select_provider("A")
            .clear_street()
            .clear_provider();
        assert!(f.is_default());
    }

    #[test]
    fn apply_matches_direct_transitions() {
        let via_apply = FilterState::default()
            .apply(FilterAction::ToggleAvailable)
            .apply(FilterAction::SelectStreet("S".into()))
            .apply(FilterAction::ToggleSingleProvider);
        let direct = FilterState::default()
            .toggle_available()
            .select_street("S")
            .toggle_single_provider();
        assert_eq!(via_apply, direct);
        assert!(via_apply.apply(FilterAction::Reset).is_default());
    }

    #[test]
    fn toggle_twice_is_identity() {
        let f = FilterState::default().toggle_unavailable().toggle_unavailable();
        assert!(f.is_default());
    }

    #[test]
    fn describe_lists_active_dimensions() {
        let text = FilterState::default()
            .toggle_unavailable()
            .select_provider("beeline")
            .describe();
        assert_eq!(text, "availability: available · providers: all · provider: beeline");
    }
}
