//! The form the autofill writes into.
//!
//! The components never touch a rendering environment directly, they go through a
//! [`FormContext`]. A browser binding implements it over the page, [`MemoryForm`] implements it
//! over plain collections.

use std::{cell::RefCell, collections::BTreeMap, fmt};

use crate::Entity;

/// A value written into a form field.
///
/// Values are written as they were computed, an absent or invalid value is not replaced with a
/// default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// Free text.
    Text(String),
    /// A whole number.
    Integer(i64),
    /// The source record did not carry the value.
    Absent,
    /// The value could not be computed from the source record.
    Invalid,
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Text)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Absent, Self::Integer)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Absent => Ok(()),
            Self::Invalid => f.write_str("invalid"),
        }
    }
}

/// An option of a selection widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    /// Text shown to the user.
    pub label: String,
    /// Value submitted with the form.
    pub value: String,
    /// Whether the option is part of the current selection.
    pub selected: bool,
}

impl SelectOption {
    /// A pre-selected option labelled by the entity name and keyed by its id.
    #[must_use]
    pub fn selected(entity: &Entity) -> Self {
        Self {
            label: entity.name.clone(),
            value: entity.id.to_string(),
            selected: true,
        }
    }
}

/// Access to the fields and widgets of the form being filled.
///
/// Every method takes `&self`: implementations are driven from a single thread and use interior
/// mutability where they need it.
pub trait FormContext {
    /// The raw value of the field with `key`, or [`None`] when there is no such field.
    fn field_value(&self, key: &str) -> Option<String>;

    /// Overwrites the value of the field with `key`.
    fn set_field_value(&self, key: &str, value: FieldValue);

    /// The cross-site request forgery token currently rendered in the form.
    fn csrf_token(&self) -> Option<String>;

    /// Deselects everything in the selection widget `widget`.
    fn reset_selection(&self, widget: &str);

    /// Appends `option` to the options of the selection widget `widget`.
    fn append_selection_option(&self, widget: &str, option: SelectOption);

    /// Tells whatever listens on `widget` that its selection changed, along with the entity that
    /// was just selected if there is one.
    fn notify_selection_changed(&self, widget: &str, selected: Option<&Entity>);
}

/// A selection-changed notification recorded by [`MemoryForm`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// The widget that changed.
    pub widget: String,
    /// The entity selected by the change, [`None`] for a reset.
    pub selected: Option<Entity>,
}

/// A [`FormContext`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryForm {
    fields: RefCell<BTreeMap<String, FieldValue>>,
    selections: RefCell<BTreeMap<String, Vec<SelectOption>>>,
    csrf_token: RefCell<Option<String>>,
    notifications: RefCell<Vec<Notification>>,
}

impl MemoryForm {
    /// An empty form without fields or a token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field holding `value`.
    #[must_use]
    pub fn with_field<K: Into<String>, V: Into<String>>(self, key: K, value: V) -> Self {
        self.fields
            .borrow_mut()
            .insert(key.into(), FieldValue::Text(value.into()));
        self
    }

    /// Sets the token returned by [`FormContext::csrf_token`].
    #[must_use]
    pub fn with_csrf_token<S: Into<String>>(self, token: S) -> Self {
        self.set_csrf_token(token);
        self
    }

    /// Replaces the token, as a page re-render would.
    pub fn set_csrf_token<S: Into<String>>(&self, token: S) {
        *self.csrf_token.borrow_mut() = Some(token.into());
    }

    /// The current value of the field with `key`.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<FieldValue> {
        self.fields.borrow().get(key).cloned()
    }

    /// All fields ordered by key.
    #[must_use]
    pub fn fields(&self) -> Vec<(String, FieldValue)> {
        self.fields
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Every option ever appended to `widget`, in append order.
    #[must_use]
    pub fn options(&self, widget: &str) -> Vec<SelectOption> {
        self.selections
            .borrow()
            .get(widget)
            .cloned()
            .unwrap_or_default()
    }

    /// The options of `widget` that are currently selected, in append order.
    #[must_use]
    pub fn selected(&self, widget: &str) -> Vec<SelectOption> {
        let mut options = self.options(widget);
        options.retain(|o| o.selected);
        options
    }

    /// Names of every widget that has been reset or appended to.
    #[must_use]
    pub fn widgets(&self) -> Vec<String> {
        self.selections.borrow().keys().cloned().collect()
    }

    /// The notifications sent so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }
}

impl FormContext for MemoryForm {
    fn field_value(&self, key: &str) -> Option<String> {
        self.fields.borrow().get(key).map(ToString::to_string)
    }

    fn set_field_value(&self, key: &str, value: FieldValue) {
        self.fields.borrow_mut().insert(key.to_owned(), value);
    }

    fn csrf_token(&self) -> Option<String> {
        self.csrf_token.borrow().clone()
    }

    fn reset_selection(&self, widget: &str) {
        self.selections
            .borrow_mut()
            .entry(widget.to_owned())
            .or_default()
            .iter_mut()
            .for_each(|o| o.selected = false);
    }

    fn append_selection_option(&self, widget: &str, option: SelectOption) {
        self.selections
            .borrow_mut()
            .entry(widget.to_owned())
            .or_default()
            .push(option);
    }

    fn notify_selection_changed(&self, widget: &str, selected: Option<&Entity>) {
        self.notifications.borrow_mut().push(Notification {
            widget: widget.to_owned(),
            selected: selected.cloned(),
        });
    }
}
