//! The profile settings form as a mounted component.
//!
//! `ProfileForm` owns the per-mount state (color input, country selection,
//! photo picker, cover uploads), binds the color input to the shared
//! [`ColorStore`] through a [`Debouncer`], resolves the phone prefix from the
//! countries table, and validates submissions against the profile schema.

use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::adapters::color_state::ColorStore;
use crate::adapters::country_loader::{CountryDirectory, CountryLoader, LoadOutcome};
use crate::adapters::debounce::Debouncer;
use crate::adapters::scope::Scope;
use crate::config::Settings;
use crate::domain::{
    CallingCodeLookup, CountrySource, CountryTable, FieldErrors, FormPayload, SubmissionSink,
};
use crate::schema::FormSchema;

pub struct ProfileForm {
    scope: Scope,
    schema: Arc<FormSchema>,
    color_store: ColorStore,
    color_input: String,
    color_debouncer: Debouncer<String>,
    loader: CountryLoader,
    initial_load: Option<JoinHandle<LoadOutcome>>,
    selected_country: String,
    photo: String,
    photo_picker_open: bool,
    password_visible: bool,
    cover: Vec<String>,
    upload_api_key: String,
    sink: Arc<dyn SubmissionSink>,
}

impl ProfileForm {
    /// Mounts the form: starts the color debouncer and requests the
    /// countries table. Must be called from within a tokio runtime.
    ///
    /// `color_store` outlives the form and is never reseeded here. Build it
    /// with [`ColorStore::from_settings`] to start from `color.initial`.
    pub fn mount(
        settings: &Settings,
        color_store: ColorStore,
        source: Arc<dyn CountrySource>,
        sink: Arc<dyn SubmissionSink>,
    ) -> Self {
        let scope = Scope::new();

        let store = color_store.clone();
        let color_debouncer =
            Debouncer::spawn(settings.color.debounce(), scope.token(), move |color: String| {
                store.set_color(color);
            });

        let loader = CountryLoader::new(source, CountryDirectory::new());
        let initial_load = loader.activate(scope.token());

        info!(
            debounce_ms = settings.color.debounce_ms,
            default_country = %settings.form.default_country,
            "profile form mounted"
        );

        Self {
            color_input: color_store.color(),
            scope,
            schema: Arc::new(FormSchema::profile(&settings.form)),
            color_store,
            color_debouncer,
            loader,
            initial_load,
            selected_country: settings.form.default_country.clone(),
            photo: String::new(),
            photo_picker_open: false,
            password_visible: false,
            cover: Vec::new(),
            upload_api_key: settings.upload.api_key.clone(),
            sink,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    // Color preference

    /// Records a color edit. The shared store only sees it once edits pause.
    pub fn edit_color(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.color_input = value.clone();
        self.color_debouncer.observe(value);
    }

    /// The color input as currently shown, ahead of the store.
    pub fn color(&self) -> &str {
        &self.color_input
    }

    pub fn color_store(&self) -> &ColorStore {
        &self.color_store
    }

    // Country and phone prefix

    /// Waits for the initial countries fetch, if it is still in flight.
    pub async fn countries_loaded(&mut self) -> Option<LoadOutcome> {
        let handle = self.initial_load.take()?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("countries load task failed: {}", e);
                None
            }
        }
    }

    /// Explicitly refetches the countries table.
    pub fn reload_countries(&self) -> JoinHandle<LoadOutcome> {
        self.loader.reload(self.scope.token())
    }

    pub fn countries(&self) -> CountryTable {
        self.loader.directory().snapshot()
    }

    pub fn select_country(&mut self, name: impl Into<String>) {
        self.selected_country = name.into();
    }

    pub fn selected_country(&self) -> &str {
        &self.selected_country
    }

    pub fn calling_code(&self) -> CallingCodeLookup {
        self.countries().resolve_calling_code(&self.selected_country)
    }

    // Photo picker and cover uploads

    pub fn open_photo_picker(&mut self) {
        self.photo_picker_open = true;
    }

    pub fn close_photo_picker(&mut self) {
        self.photo_picker_open = false;
    }

    pub fn photo_picker_open(&self) -> bool {
        self.photo_picker_open
    }

    /// Callback from the photo picker.
    pub fn choose_photo(&mut self, reference: impl Into<String>) {
        self.photo = reference.into();
        self.photo_picker_open = false;
    }

    pub fn photo(&self) -> &str {
        &self.photo
    }

    /// Callback from the upload collaborator with the stored file's URL.
    pub fn cover_uploaded(&mut self, file_url: impl Into<String>) {
        self.cover.push(file_url.into());
    }

    pub fn cover(&self) -> &[String] {
        &self.cover
    }

    pub fn upload_api_key(&self) -> &str {
        &self.upload_api_key
    }

    pub fn toggle_password_visible(&mut self) {
        self.password_visible = !self.password_visible;
    }

    pub fn password_visible(&self) -> bool {
        self.password_visible
    }

    // Submission

    /// Validates the raw field map merged with the form-owned values and
    /// hands the payload to the sink. Nothing reaches the sink on failure.
    pub fn submit(&self, mut raw: Map<String, Value>) -> Result<FormPayload, FieldErrors> {
        raw.insert("color".to_string(), Value::String(self.color_input.clone()));
        raw.insert("country".to_string(), Value::String(self.selected_country.clone()));
        raw.insert("photo".to_string(), Value::String(self.photo.clone()));
        raw.insert(
            "cover".to_string(),
            Value::Array(self.cover.iter().cloned().map(Value::String).collect()),
        );

        match self.schema.validate(&raw) {
            Ok(payload) => {
                self.sink.deliver(&payload);
                Ok(payload)
            }
            Err(errors) => {
                info!(failed = errors.len(), "profile submission rejected");
                for (field, error) in errors.iter() {
                    debug!(field, %error, "field failed validation");
                }
                Err(errors)
            }
        }
    }

    /// Ends the scope. Pending color edits are dropped and a countries
    /// response arriving later is discarded.
    pub fn unmount(self) {
        debug!("profile form unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::country_loader::FetchError;
    use crate::adapters::submission_sink::ChannelSink;
    use crate::domain::{CountryRecord, FieldValue, ValidationError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::Notify;

    struct FixedSource(Vec<CountryRecord>);

    #[async_trait]
    impl CountrySource for FixedSource {
        async fn fetch(&self) -> Result<Vec<CountryRecord>, FetchError> {
            Ok(self.0.clone())
        }
    }

    /// Holds the response until released.
    struct GatedSource {
        gate: Arc<Notify>,
        records: Vec<CountryRecord>,
    }

    #[async_trait]
    impl CountrySource for GatedSource {
        async fn fetch(&self) -> Result<Vec<CountryRecord>, FetchError> {
            self.gate.notified().await;
            Ok(self.records.clone())
        }
    }

    fn countries() -> Vec<CountryRecord> {
        vec![
            CountryRecord::new("Afghanistan", &["93"]),
            CountryRecord::new("Canada", &["1"]),
        ]
    }

    fn raw_fields() -> Map<String, Value> {
        match json!({
            "username": "ada",
            "password": "secret",
            "about": "Hi",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "birthday": "1815-12-10",
            "phone": "5550100",
            "url": "https://example.com",
            "streetAddress": "1 Main St",
            "city": "London",
            "region": "",
            "postalCode": "W1",
            "offers": true,
            "pushNotifications": "push-nothing",
            "rating": "5",
            "experience": "10"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn mount(
        source: Arc<dyn CountrySource>,
    ) -> (ProfileForm, UnboundedReceiver<FormPayload>, ColorStore) {
        let (sink, rx) = ChannelSink::new();
        let store = ColorStore::default();
        let form = ProfileForm::mount(&Settings::default(), store.clone(), source, Arc::new(sink));
        (form, rx, store)
    }

    #[tokio::test]
    async fn test_calling_code_follows_selection() {
        let (mut form, _rx, _store) = mount(Arc::new(FixedSource(countries())));
        assert_eq!(form.selected_country(), "Afghanistan");

        assert_eq!(form.countries_loaded().await, Some(LoadOutcome::Replaced(2)));
        assert_eq!(form.calling_code(), CallingCodeLookup::Found("93".into()));

        form.select_country("Canada");
        assert_eq!(form.calling_code().prefix(), "+1");

        form.select_country("Nowhere");
        assert_eq!(form.calling_code(), CallingCodeLookup::NoMatch);
    }

    #[tokio::test]
    async fn test_lookup_before_load_reports_loading() {
        let gate = Arc::new(Notify::new());
        let source = GatedSource {
            gate: gate.clone(),
            records: countries(),
        };
        let (mut form, _rx, _store) = mount(Arc::new(source));

        assert_eq!(form.calling_code(), CallingCodeLookup::Loading);
        assert!(form.countries().is_empty());

        gate.notify_one();
        form.countries_loaded().await;
        assert_eq!(form.calling_code().code(), Some("93"));
    }

    #[tokio::test]
    async fn test_late_countries_after_unmount_are_discarded() {
        let gate = Arc::new(Notify::new());
        let (mut form, _rx, _store) = mount(Arc::new(GatedSource {
            gate: gate.clone(),
            records: countries(),
        }));
        let directory = form.loader.directory().clone();
        let handle = form.initial_load.take().unwrap();

        form.unmount();
        gate.notify_one();

        assert_eq!(handle.await.unwrap(), LoadOutcome::Stale);
        assert!(directory.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_color_edits_are_debounced_into_store() {
        let (mut form, _rx, store) = mount(Arc::new(FixedSource(vec![])));

        form.edit_color("#111111");
        form.edit_color("#222222");
        form.edit_color("#333333");
        assert_eq!(form.color(), "#333333");
        assert_eq!(store.state().revision, 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let state = store.state();
        assert_eq!(state.color, "#333333");
        assert_eq!(state.revision, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_cancels_pending_color() {
        let (mut form, _rx, store) = mount(Arc::new(FixedSource(vec![])));
        form.edit_color("#999999");
        form.unmount();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.state().revision, 0);
        assert_eq!(store.color(), "#1F2937");
    }

    #[tokio::test]
    async fn test_submit_delivers_exactly_one_payload() {
        let (mut form, mut rx, _store) = mount(Arc::new(FixedSource(countries())));
        form.countries_loaded().await;
        form.select_country("Canada");
        form.edit_color("#336699");
        form.open_photo_picker();
        form.choose_photo("https://images.example.com/ada.png");
        form.cover_uploaded("https://upcdn.example.com/cover.jpg");

        let mut raw = raw_fields();
        raw.insert("newsletter".into(), json!(true));
        let payload = form.submit(raw).expect("valid submission");

        let received = rx.recv().await.unwrap();
        assert_eq!(received, payload);
        assert!(rx.try_recv().is_err());

        assert_eq!(payload.get("country"), Some(&FieldValue::Text("Canada".into())));
        assert_eq!(payload.get("color"), Some(&FieldValue::Text("#336699".into())));
        assert_eq!(
            payload.get("cover"),
            Some(&FieldValue::List(vec!["https://upcdn.example.com/cover.jpg".into()]))
        );
        assert_eq!(payload.get("offers"), Some(&FieldValue::Flag(true)));
        assert!(!payload.contains("comments"));
        assert!(!payload.contains("newsletter"));
        assert!(!form.photo_picker_open());
    }

    #[tokio::test]
    async fn test_rejected_submit_reaches_no_sink() {
        let (form, mut rx, _store) = mount(Arc::new(FixedSource(countries())));

        let mut raw = raw_fields();
        raw.insert("username".into(), json!("abcdef"));
        raw.insert("email".into(), json!("not-an-email"));
        let errors = form.submit(raw).unwrap_err();

        assert_eq!(errors.get("username"), Some(&ValidationError::TooLong { max: 5 }));
        assert_eq!(errors.get("email"), Some(&ValidationError::InvalidEmail));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_color_input_starts_from_configured_initial() {
        let mut settings = Settings::default();
        settings.color.initial = "#0EA5E9".to_string();
        let store = ColorStore::from_settings(&settings.color);
        let (sink, _rx) = ChannelSink::new();

        let form = ProfileForm::mount(
            &settings,
            store.clone(),
            Arc::new(FixedSource(vec![])),
            Arc::new(sink),
        );
        assert_eq!(form.color(), "#0EA5E9");
        assert_eq!(form.color_store().color(), "#0EA5E9");
        assert_eq!(store.state().revision, 0);
    }

    #[tokio::test]
    async fn test_password_toggle_and_upload_key() {
        let (mut form, _rx, _store) = mount(Arc::new(FixedSource(vec![])));
        assert!(!form.password_visible());
        form.toggle_password_visible();
        assert!(form.password_visible());
        assert_eq!(form.upload_api_key(), "free");
    }
}
