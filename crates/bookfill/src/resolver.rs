use std::rc::Rc;

use log::debug;

use crate::{
    api::get_or_create::{get_or_create, Resolution},
    form::{FormContext, SelectOption},
    Client, Config, EntityKind,
};

/// Turns names into selected options of one selection widget.
///
/// Every name is resolved by its own get-or-create request. Options are appended in the order the
/// answers arrive, a failed request leaves the widget as it was.
pub struct EntityResolver<C, F> {
    kind: EntityKind,
    client: Rc<C>,
    form: Rc<F>,
    url: String,
    widget: String,
}

impl<C, F> EntityResolver<C, F>
where
    C: Client + 'static,
    F: FormContext + 'static,
{
    /// Creates a resolver for `kind` targeting the widget configured for that kind.
    #[must_use]
    pub fn new(kind: EntityKind, client: Rc<C>, form: Rc<F>, config: &Config) -> Self {
        let widget = match kind {
            EntityKind::Author => config.fields.authors.clone(),
            EntityKind::Publisher => config.fields.publisher.clone(),
        };

        Self {
            kind,
            client,
            form,
            url: config.site_endpoint(kind.endpoint()),
            widget,
        }
    }

    /// Clears the widget selection then resolves every name in `names`.
    ///
    /// The reset happens immediately, even when `names` is empty.
    pub fn replace_selection<I>(&self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.form.reset_selection(&self.widget);
        self.form.notify_selection_changed(&self.widget, None);

        for name in names {
            self.resolve(name);
        }
    }

    /// Starts resolving `name` on the local task set and returns straight away.
    ///
    /// The token is read from the form now, not when the request is sent.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a [`tokio::task::LocalSet`].
    pub fn resolve(&self, name: String) {
        let csrf_token = self.form.csrf_token();
        let client = Rc::clone(&self.client);
        let form = Rc::clone(&self.form);
        let url = self.url.clone();
        let widget = self.widget.clone();
        let kind = self.kind;

        tokio::task::spawn_local(async move {
            match get_or_create(&*client, &url, &name, csrf_token.as_deref()).await {
                Ok(Resolution { entity, created }) => {
                    debug!(
                        "Resolved {kind} '{name}' to id {} (created: {created})",
                        entity.id
                    );
                    form.append_selection_option(&widget, SelectOption::selected(&entity));
                    form.notify_selection_changed(&widget, Some(&entity));
                }
                // no retry and nothing shown to the user, the widget keeps its cleared state
                Err(err) => debug!("Dropped {kind} '{name}': {err}"),
            }
        });
    }
}

#[cfg(test)]
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use tokio::{sync::Notify, task::LocalSet};

    use super::{settle, EntityResolver};
    use crate::{
        api::{entity_reply, recorded_requests, MockClient, Reply},
        form::{MemoryForm, Notification},
        Config, Entity, EntityKind,
    };

    fn json(id: i64, name: &str) -> String {
        serde_json::json!({ "id": id, "name": name }).to_string()
    }

    fn resolver(
        kind: EntityKind,
        client: MockClient,
        form: &Rc<MemoryForm>,
    ) -> EntityResolver<MockClient, MemoryForm> {
        EntityResolver::new(kind, Rc::new(client), Rc::clone(form), &Config::default())
    }

    fn labels(form: &MemoryForm, widget: &str) -> Vec<String> {
        form.selected(widget).into_iter().map(|o| o.label).collect()
    }

    #[tokio::test]
    async fn options_are_appended_in_arrival_order() {
        let first = Rc::new(Notify::new());
        let second = Rc::new(Notify::new());
        let (gate_a, gate_b) = (Rc::clone(&first), Rc::clone(&second));

        let client = MockClient::new(move |request| match request.name() {
            Some("Harold Abelson") => {
                Reply::Gated(Rc::clone(&gate_a), 200, json(1, "Harold Abelson"))
            }
            _ => Reply::Gated(Rc::clone(&gate_b), 200, json(2, "Gerald Jay Sussman")),
        });
        let form = Rc::new(MemoryForm::new().with_csrf_token("t0ken"));
        let authors = resolver(EntityKind::Author, client, &form);

        let local = LocalSet::new();
        local
            .run_until(async {
                authors.replace_selection(vec![
                    "Harold Abelson".to_owned(),
                    "Gerald Jay Sussman".to_owned(),
                ]);
                settle().await;
                second.notify_one();
                settle().await;
                first.notify_one();
            })
            .await;
        local.await;

        assert_eq!(
            vec!["Gerald Jay Sussman".to_owned(), "Harold Abelson".to_owned()],
            labels(&form, "id_authors")
        );
        assert_eq!(2, recorded_requests().len());
    }

    #[tokio::test]
    async fn reset_comes_before_any_option() {
        let client = MockClient::new(|request| entity_reply(request, 4));
        let form = Rc::new(MemoryForm::new());
        let publisher = resolver(EntityKind::Publisher, client, &form);

        let local = LocalSet::new();
        local
            .run_until(async { publisher.replace_selection(Some("MIT Press".to_owned())) })
            .await;
        local.await;

        assert_eq!(
            vec![
                Notification {
                    widget: "id_publisher".to_owned(),
                    selected: None,
                },
                Notification {
                    widget: "id_publisher".to_owned(),
                    selected: Some(Entity {
                        id: 4,
                        name: "MIT Press".to_owned(),
                    }),
                },
            ],
            form.notifications()
        );
        assert_eq!(
            vec!["http://localhost:8000/api/publishers/get_or_create".to_owned()],
            recorded_requests().into_iter().map(|r| r.url).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn token_is_read_at_call_time() {
        let client = MockClient::new(|request| entity_reply(request, 1));
        let form = Rc::new(MemoryForm::new().with_csrf_token("before"));
        let authors = resolver(EntityKind::Author, client, &form);

        let local = LocalSet::new();
        local
            .run_until(async {
                authors.resolve("Harold Abelson".to_owned());
                form.set_csrf_token("after");
                authors.resolve("Gerald Jay Sussman".to_owned());
            })
            .await;
        local.await;

        let tokens: Vec<_> = recorded_requests()
            .into_iter()
            .map(|r| r.csrf_token)
            .collect();
        assert_eq!(
            vec![Some("before".to_owned()), Some("after".to_owned())],
            tokens
        );
    }

    #[tokio::test]
    async fn failed_resolution_leaves_widget_cleared() {
        let client = MockClient::new(|request| match request.name() {
            Some("Harold Abelson") => Reply::NetworkError,
            _ => Reply::Respond(403, "CSRF verification failed".to_owned()),
        });
        let form = Rc::new(MemoryForm::new());
        let authors = resolver(EntityKind::Author, client, &form);

        let local = LocalSet::new();
        local
            .run_until(async {
                authors.replace_selection(vec![
                    "Harold Abelson".to_owned(),
                    "Gerald Jay Sussman".to_owned(),
                ]);
            })
            .await;
        local.await;

        assert!(form.selected("id_authors").is_empty());
        assert_eq!(1, form.notifications().len());
    }

    #[tokio::test]
    async fn pending_resolution_never_changes_widget() {
        let client = MockClient::new(|_| Reply::Pending);
        let form = Rc::new(MemoryForm::new());
        let publisher = resolver(EntityKind::Publisher, client, &form);

        let local = LocalSet::new();
        local
            .run_until(async {
                publisher.replace_selection(Some("MIT Press".to_owned()));
                settle().await;
            })
            .await;

        assert_eq!(1, recorded_requests().len());
        assert!(form.selected("id_publisher").is_empty());
        assert_eq!(1, form.notifications().len());
    }

    #[tokio::test]
    async fn empty_names_still_reset() {
        let client = MockClient::new(|_| Reply::Pending);
        let form = Rc::new(MemoryForm::new());
        let authors = resolver(EntityKind::Author, client, &form);

        let local = LocalSet::new();
        local
            .run_until(async { authors.replace_selection(Vec::new()) })
            .await;
        local.await;

        assert!(recorded_requests().is_empty());
        assert_eq!(vec!["id_authors".to_owned()], form.widgets());
    }
}
