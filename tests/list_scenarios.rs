//! End-to-end scenarios through the public API: classification, tracker
//! counting, ordering and buttons for one build pass.

use modlist::agents::ListBuilder;
use modlist::capability::InstalledPackages;
use modlist::engine::ordering::{ClassifiedEntry, SortMode, sort_entries};
use modlist::engine::{ActionButton, ButtonCapabilityResolver, Category, EntryClassifier, ExclusionRules, UpdateTracker};
use modlist::model::{Entry, LocalInfo, ModuleEntry, NotificationKind, RemoteInfo, SeparatorKind};
use modlist::settings::DisplaySettings;

fn installed(id: &str, version: i64) -> LocalInfo {
    LocalInfo::new(id, id, version)
}

fn catalog(id: &str, version: i64) -> RemoteInfo {
    let mut remote = RemoteInfo::new(id, "main", id, version, format!("https://cdn.test/{id}.zip"));
    remote.author = Some("Maintainer".into());
    remote.description = Some(format!("The {id} module"));
    remote
}

fn module(id: &str, installed_version: i64, remote_version: i64) -> Entry {
    Entry::Module(
        ModuleEntry::new(
            id,
            Some(installed(id, installed_version)),
            Some(catalog(id, remote_version)),
        )
        .unwrap(),
    )
}

#[test]
fn update_without_rules_is_counted() {
    let rules = ExclusionRules::new();
    let classifier = EntryClassifier::new(&rules, false);
    let mut tracker = UpdateTracker::new();

    let category = classifier.classify(&module("foo", 1, 2), &mut tracker);
    assert_eq!(category, Category::Updatable);
    assert_eq!(tracker.count(), 1);
    assert!(tracker.has_updates());
}

#[test]
fn at_least_rule_suppresses_update() {
    let rules = ExclusionRules::from_lists(Vec::<String>::new(), ["foo:^2"]);
    let classifier = EntryClassifier::new(&rules, false);
    let mut tracker = UpdateTracker::new();

    let category = classifier.classify(&module("foo", 1, 2), &mut tracker);
    assert_eq!(category, Category::Installable);
    assert_eq!(tracker.count(), 0);
}

#[test]
fn matching_versions_are_installed() {
    let rules = ExclusionRules::new();
    let classifier = EntryClassifier::new(&rules, false);
    let mut tracker = UpdateTracker::new();

    assert_eq!(
        classifier.classify(&module("bar", 5, 5), &mut tracker),
        Category::Installed
    );
}

#[test]
fn mixed_rows_sort_by_bucket() {
    let rules = ExclusionRules::new();
    let classifier = EntryClassifier::new(&rules, false);
    let mut tracker = UpdateTracker::new();

    let rows = vec![
        Entry::Separator(SeparatorKind::Updatable),
        Entry::notification(NotificationKind::NoInternet),
        module("bar", 5, 5),
        module("foo", 1, 2),
    ];
    let mut classified: Vec<ClassifiedEntry> = rows
        .into_iter()
        .map(|entry| {
            let category = classifier.classify(&entry, &mut tracker);
            ClassifiedEntry::new(entry, category)
        })
        .collect();
    sort_entries(&mut classified, SortMode::Update);

    let order: Vec<(String, Category)> = classified
        .iter()
        .map(|row| (row.entry.id().to_string(), row.category))
        .collect();
    assert_eq!(
        order,
        vec![
            (String::new(), Category::Separator(SeparatorKind::Updatable)),
            (String::new(), Category::Notification(NotificationKind::NoInternet)),
            ("foo".to_string(), Category::Updatable),
            ("bar".to_string(), Category::Installed),
        ]
    );
    assert_eq!(tracker.count(), 1);
}

#[test]
fn hidden_module_is_flagged_first() {
    let packages = InstalledPackages::default();
    let resolver = ButtonCapabilityResolver::new(&packages, true, false);
    let entry = Entry::Module(ModuleEntry::installed(installed(".hidden", 1)));

    let buttons = resolver.resolve(&entry);
    assert_eq!(buttons.first(), Some(&ActionButton::Warning));
}

#[test]
fn distinct_updates_are_counted_once_per_build() {
    let rules = ExclusionRules::from_lists(["frozen"], ["pinned:3"]);
    let packages = InstalledPackages::default();
    let builder = ListBuilder::new(&rules, &packages, DisplaySettings::default());

    let installed_modules = vec![
        installed("a", 1),
        installed("b", 1),
        installed("c", 1),
        installed("frozen", 1),
        installed("pinned", 1),
    ];
    let catalog_modules = vec![
        catalog("a", 2),
        catalog("b", 2),
        catalog("c", 1),
        catalog("frozen", 9),
        catalog("pinned", 3),
    ];

    let list = builder
        .build(installed_modules, catalog_modules)
        .unwrap();
    assert_eq!(list.summary.count, 2);
    assert_eq!(list.summary.module_ids, vec!["a".to_string(), "b".to_string()]);

    let categories: Vec<(&str, Category)> = list
        .rows
        .iter()
        .map(|row| (row.entry.id(), row.category))
        .collect();
    assert_eq!(
        categories,
        vec![
            ("a", Category::Updatable),
            ("b", Category::Updatable),
            ("c", Category::Installed),
            ("frozen", Category::Installable),
            ("pinned", Category::Installable),
        ]
    );
}

#[test]
fn search_keeps_the_update_badge_count() {
    let rules = ExclusionRules::new();
    let packages = InstalledPackages::default();
    let installed_modules = vec![installed("alpha", 1), installed("beta", 1)];
    let catalog_modules = vec![catalog("alpha", 2), catalog("beta", 2)];

    let searched = ListBuilder::new(&rules, &packages, DisplaySettings::default())
        .query("alpha")
        .build(installed_modules, catalog_modules)
        .unwrap();

    assert_eq!(searched.rows.len(), 1);
    assert_eq!(searched.summary.count, 2);
    assert_eq!(
        searched.summary.module_ids,
        vec!["alpha".to_string(), "beta".to_string()]
    );
}

#[test]
fn pending_updates_report_the_version_that_triggered_them() {
    let rules = ExclusionRules::new();
    let packages = InstalledPackages::default();
    let builder = ListBuilder::new(&rules, &packages, DisplaySettings::default());

    let mut self_hosted = installed("selfhost", 1);
    self_hosted.update_version_code = 5;
    self_hosted.update_zip_url = Some("https://self.test/s.zip".into());
    let mut mixed = installed("mixed", 1);
    mixed.update_version_code = 5;
    mixed.update_zip_url = Some("https://self.test/m.zip".into());

    let list = builder
        .build(vec![self_hosted, mixed], vec![catalog("mixed", 3)])
        .unwrap();

    let pending: Vec<(&str, i64, &str)> = list
        .updatable()
        .map(|module| {
            let download = module.pending_download().unwrap();
            (module.id(), module.available_version_code(), download.source)
        })
        .collect();
    assert_eq!(
        pending,
        vec![("mixed", 5, "update_json"), ("selfhost", 5, "update_json")]
    );
}
