use es_locale_core::action::{
    InitializePayload, add_translation, add_translation_for_language, initialize,
    set_active_language,
};
use es_locale_core::{
    Element, LocaleState, MissingTranslationHandler, OptionsPatch, RenderToStaticMarkup,
    TranslateOptions, TranslationTransform, placeholders,
};
use es_locale_store::{LocaleStore, StoreError};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn store_with(options: OptionsPatch) -> LocaleStore {
    let store = LocaleStore::new();
    store
        .dispatch(&initialize(
            InitializePayload::builder()
                .languages(vec!["en".into(), "fr".into()])
                .translation(json!({ "welcome": ["Welcome ${name}", "Bienvenue ${name}"] }))
                .options(options)
                .build(),
        ))
        .expect("initialize should succeed");
    store
}

fn store() -> LocaleStore {
    store_with(OptionsPatch::default())
}

fn reinitialize(store: &LocaleStore, options: OptionsPatch) -> bool {
    store
        .dispatch(&initialize(
            InitializePayload::builder()
                .languages(vec!["en".into(), "fr".into()])
                .options(options)
                .build(),
        ))
        .expect("re-initialize should succeed")
}

#[test]
fn subscribers_are_notified_only_on_change() {
    let store = store();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(store.dispatch(&set_active_language("fr")).unwrap());
    assert!(!store.dispatch(&set_active_language("fr")).unwrap());
    let action = add_translation(json!({ "bye": ["Bye", "Au revoir"] }));
    assert!(store.dispatch(&action).unwrap());
    assert!(!store.dispatch(&action).unwrap());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn listeners_receive_the_new_state() {
    let store = store();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |state: &LocaleState| {
        let active = state
            .languages
            .iter()
            .find(|lang| lang.active)
            .map(|lang| lang.code.clone());
        sink.lock().push(active);
    });

    store.dispatch(&set_active_language("fr")).unwrap();
    store.dispatch(&set_active_language("zz")).unwrap();

    assert_eq!(*seen.lock(), vec![Some("fr".to_string()), None]);
}

#[test]
fn unsubscribed_listeners_are_not_called() {
    let store = store();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let id = store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    store.unsubscribe(id);

    store.dispatch(&set_active_language("fr")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn invalid_initialize_leaves_the_store_untouched() {
    let store = store();
    let before = store.state();

    let result = store.dispatch(&initialize(
        InitializePayload::builder()
            .languages(vec!["de".into()])
            .options(OptionsPatch::builder().default_language("").build())
            .build(),
    ));

    assert!(matches!(result, Err(StoreError::Locale(_))));
    assert!(Arc::ptr_eq(&before, &store.state()));
}

#[test]
fn translate_through_the_store() {
    let store = store();
    let data = placeholders!("name" => "Ada");

    let en = store.translate_with("welcome", &data, &TranslateOptions::default());
    assert_eq!(en.into_single().unwrap().to_string(), "Welcome Ada");

    store.dispatch(&set_active_language("fr")).unwrap();
    assert_eq!(store.active_language().map(|lang| lang.code), Some("fr".to_string()));
    let fr = store.translate_with("welcome", &data, &TranslateOptions::default());
    assert_eq!(fr.into_single().unwrap().to_string(), "Bienvenue Ada");

    let invalid = store.translate_value(&json!(true), &data, &TranslateOptions::default());
    assert!(matches!(invalid, Err(StoreError::Locale(_))));
}

#[test]
fn hydration_round_trip() {
    let store = store_with(
        OptionsPatch::builder()
            .render_inner_html(true)
            .default_language("fr")
            .build(),
    );
    store.dispatch(&add_translation_for_language(json!({ "title": "Titre" }), "fr")).unwrap();

    let persisted = store.to_json().unwrap();
    assert_eq!(persisted["options"]["defaultLanguage"], "fr");
    assert_eq!(persisted["options"]["renderInnerHtml"], true);
    assert_eq!(persisted["translations"]["title"], json!([null, "Titre"]));

    let hydrated = LocaleStore::from_json(persisted.clone()).unwrap();
    assert_eq!(hydrated.to_json().unwrap(), persisted);
    assert_eq!(hydrated.languages(), store.languages());
    assert_eq!(hydrated.text("welcome"), store.text("welcome"));
}

#[test]
fn hydration_rejects_malformed_state() {
    let result = LocaleStore::from_json(json!({ "languages": "en" }));
    assert!(matches!(result, Err(StoreError::Hydration(_))));
}

#[test]
fn default_text_is_registered_once() {
    let store = store();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(store.register_default_translation("cta", "Sign up").unwrap());
    assert!(!store.register_default_translation("cta", "Sign up").unwrap());
    assert!(store.register_default_translation("cta", "Join").unwrap());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.state().translations["cta"], vec![Some("Join".to_string()), None]);
}

#[test]
fn default_element_uses_static_renderer() {
    let renderer = RenderToStaticMarkup::renderer(|element: &Element| {
        element
            .downcast_ref::<&str>()
            .map(|text| format!("<em>{text}</em>"))
            .unwrap_or_default()
    });
    let store = store_with(OptionsPatch::builder().render_to_static_markup(renderer).build());

    assert!(store.register_default_translation("note", Element::new("hey")).unwrap());
    assert_eq!(
        store.state().translations["note"],
        vec![Some("<em>hey</em>".to_string()), None]
    );
}

#[test]
fn renderer_set_on_reinitialize_is_kept() {
    let store = store();
    let renderer = RenderToStaticMarkup::renderer(|element: &Element| {
        element
            .downcast_ref::<u8>()
            .map(|value| format!("<b>{value}</b>"))
            .unwrap_or_default()
    });

    assert!(!reinitialize(&store, OptionsPatch::builder().render_to_static_markup(renderer).build()));

    assert!(store.register_default_translation("k", Element::new(1u8)).unwrap());
    assert_eq!(store.state().translations["k"], vec![Some("<b>1</b>".to_string()), None]);
}

#[test]
fn transform_set_on_reinitialize_is_kept() {
    let store = store();
    let transform = TranslationTransform::new(|_: &Value, _: &[String]| json!({ "hi": ["T", "T"] }));

    reinitialize(&store, OptionsPatch::builder().translation_transform(transform).build());
    store.dispatch(&add_translation(json!({ "ignored": "x" }))).unwrap();

    assert_eq!(store.text("hi"), "T");
}

#[test]
fn missing_translation_callback_is_replaced_on_reinitialize() {
    let store = store();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    reinitialize(
        &store,
        OptionsPatch::builder()
            .on_missing_translation(MissingTranslationHandler::callback(|_| "A".to_string()))
            .build(),
    );
    assert_eq!(store.text("nope"), "A");

    reinitialize(
        &store,
        OptionsPatch::builder()
            .on_missing_translation(MissingTranslationHandler::callback(|_| "B".to_string()))
            .build(),
    );
    assert_eq!(store.text("nope"), "B");
    // Only the switch from the default template to a callback is structural.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[case::no_renderer(OptionsPatch::default(), TranslateOptions::default())]
#[case::ignored_by_options(
    OptionsPatch::builder().ignore_translate_children(true).build(),
    TranslateOptions::default()
)]
#[case::ignored_per_call(
    OptionsPatch::builder()
        .render_to_static_markup(RenderToStaticMarkup::renderer(|_| "x".to_string()))
        .build(),
    TranslateOptions::builder().ignore_translate_children(true).build()
)]
fn default_element_is_skipped(#[case] options: OptionsPatch, #[case] overrides: TranslateOptions) {
    let store = store_with(options);

    let dispatched = store
        .register_default_translation_with("note", Element::new("hey"), &overrides)
        .unwrap();

    assert!(!dispatched);
    assert!(!store.state().translations.contains_key("note"));
}

#[test]
fn concurrent_dispatches_are_serialized() {
    let store = store();
    let keys: Vec<String> = (0..16).map(|index| format!("key{index}")).collect();

    thread::scope(|scope| {
        for key in &keys {
            let store = &store;
            scope.spawn(move || {
                store
                    .dispatch(&add_translation_for_language(json!({ key.as_str(): key }), "en"))
                    .unwrap();
                store.text(key)
            });
        }
    });

    let state = store.state();
    for key in &keys {
        assert_eq!(state.translations[key.as_str()], vec![Some(key.clone()), None]);
    }
    assert_eq!(store.text("key3"), "key3");
}
