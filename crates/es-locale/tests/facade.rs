use es_locale::action::{InitializePayload, add_translation, initialize};
use es_locale::serde_json::json;
use es_locale::{LocaleState, Selectors, Translated, placeholders, reduce};

#[test]
fn reducer_and_selectors_are_reexported() {
    let state = reduce(
        &LocaleState::default(),
        &initialize(
            InitializePayload::builder()
                .languages(vec!["en".into()])
                .build(),
        ),
    )
    .unwrap();
    let state = reduce(&state, &add_translation(json!({ "count": ["Count: ${count}"] }))).unwrap();

    let selectors = Selectors::new();
    let result = selectors.translator(&state).translate_with(
        "count",
        &placeholders!("count" => 0),
        &Default::default(),
    );
    assert_eq!(result.into_single(), Some(Translated::Text("Count: 0".to_string())));
}

#[cfg(feature = "store")]
#[test]
fn store_is_reexported() {
    let store = es_locale::LocaleStore::new();
    assert!(store.active_language().is_none());
    assert_eq!(store.text("any"), "Missing translationId: any for language: ${ languageCode }");
}

#[cfg(all(feature = "store", feature = "toml"))]
#[test]
fn store_from_manifest_dir_loads_assets() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("locale.toml"),
        "languages = [\"en\", \"fr\"]\nactive_language = \"fr\"\nassets_dir = \"locales\"\n",
    )
    .unwrap();
    std::fs::create_dir(temp_dir.path().join("locales")).unwrap();
    std::fs::write(
        temp_dir.path().join("locales").join("fr.json"),
        r#"{ "hello": "Bonjour" }"#,
    )
    .unwrap();

    let store = es_locale::store_from_manifest_dir(temp_dir.path()).unwrap();
    assert_eq!(store.text("hello"), "Bonjour");
}
