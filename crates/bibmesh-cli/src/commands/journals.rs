use crate::cli::{JournalFilterArgs, StoreArgs};
use crate::support::{build_engine_or_exit, print_journals};

pub fn run(stores: &StoreArgs, filter: JournalFilterArgs, json: bool) {
    let engine = build_engine_or_exit(stores);

    let (label, journals) = if let Some(title) = &filter.title {
        ("journals --title", engine.get_journals_with_title(title))
    } else if let Some(publisher) = &filter.publisher {
        (
            "journals --publisher",
            engine.get_journals_published_by(publisher),
        )
    } else if !filter.licenses.is_empty() {
        (
            "journals --license",
            engine.get_journals_with_license(&filter.licenses),
        )
    } else if filter.apc {
        ("journals --apc", engine.get_journals_with_apc())
    } else if filter.seal {
        ("journals --seal", engine.get_journals_with_doaj_seal())
    } else {
        ("journals", engine.get_all_journals())
    };

    print_journals(label, &journals, json);
}
