use std::rc::Rc;

use bookfill::{Config, MemoryForm, SelectOption};
use eyre::{eyre, Context};
use log::{info, trace};
use tokio::{runtime, task::LocalSet};

/// Runs the autofill against an in-memory form holding `isbn` and waits for every request to
/// finish.
pub fn fill(
    isbn: &str,
    csrf_token: Option<String>,
    config: Config,
) -> eyre::Result<Rc<MemoryForm>> {
    let mut form = MemoryForm::new().with_field(config.fields.isbn.clone(), isbn);
    if let Some(token) = csrf_token {
        form = form.with_csrf_token(token);
    }
    let form = Rc::new(form);

    let runtime = runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err_with(|| eyre!("Cannot start the async runtime"))?;

    let local = LocalSet::new();
    local.block_on(&runtime, async {
        bookfill::try_fill_book(Rc::clone(&form), config);
    });

    trace!("Waiting for outstanding requests..");
    runtime.block_on(local);

    if form.fields().len() == 1 {
        info!("Nothing was filled in for '{isbn}'");
    }

    Ok(form)
}

/// One `key: value` line per field then one per selection widget.
pub fn render(form: &MemoryForm) -> String {
    let fields = form
        .fields()
        .into_iter()
        .map(|(key, value)| format!("{key}: {value}\n"));

    let widgets = form.widgets().into_iter().map(|widget| {
        let selected = form
            .selected(&widget)
            .iter()
            .map(|SelectOption { label, value, .. }| format!("{label} ({value})"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{widget}: {selected}\n")
    });

    fields.chain(widgets).collect()
}

#[test]
fn render_lists_fields_then_selections() {
    use bookfill::{Entity, FieldValue, FormContext};

    let form = MemoryForm::new().with_field("id_isbn", "9780262510875");
    form.set_field_value("id_page_count", FieldValue::Integer(657));
    form.reset_selection("id_authors");
    form.append_selection_option(
        "id_authors",
        SelectOption::selected(&Entity {
            id: 12,
            name: "Harold Abelson".to_owned(),
        }),
    );

    assert_eq!(
        "id_isbn: 9780262510875\nid_page_count: 657\nid_authors: Harold Abelson (12)\n",
        render(&form)
    );
}

#[test]
fn render_of_empty_form_is_empty() {
    assert_eq!("", render(&MemoryForm::new()));
}

#[test]
fn render_lists_widget_with_no_selection() {
    use bookfill::FormContext;

    let form = MemoryForm::new();
    form.reset_selection("id_publisher");

    assert_eq!("id_publisher: \n", render(&form));
}
