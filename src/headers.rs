use clap::ValueEnum;
use serde::Serialize;

/// Admin pages that pull in this field's assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderCategory {
    Publish,
    Filter,
    Settings,
}

impl HeaderCategory {
    fn bit(self) -> u8 {
        match self {
            HeaderCategory::Publish => 1,
            HeaderCategory::Filter => 2,
            HeaderCategory::Settings => 4,
        }
    }
}

/// Categories whose headers a page has already received. Owned by the caller
/// rendering the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendedHeaders(u8);

impl AppendedHeaders {
    pub fn contains(&self, category: HeaderCategory) -> bool {
        self.0 & category.bit() == category.bit()
    }

    fn insert(&mut self, category: HeaderCategory) {
        self.0 |= category.bit();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Asset {
    Stylesheet {
        url: String,
        media: &'static str,
        priority: u32,
    },
    Script {
        url: String,
        priority: u32,
    },
}

const PRIORITY: u32 = 10251840;

/// Assets `category` needs, or nothing if `appended` already covers it.
pub fn append_headers(
    appended: &mut AppendedHeaders,
    category: HeaderCategory,
    base_url: &str,
) -> Vec<Asset> {
    if appended.contains(category) {
        return Vec::new();
    }
    appended.insert(category);

    let base = base_url.trim_end_matches('/');
    let url = |file: &str| format!("{}/extensions/textboxfield/assets/{}", base, file);
    let stylesheet = |file: &str| Asset::Stylesheet {
        url: url(file),
        media: "screen",
        priority: PRIORITY,
    };
    let script = |file: &str, priority: u32| Asset::Script {
        url: url(file),
        priority,
    };

    match category {
        HeaderCategory::Publish => vec![stylesheet("publish.css"), script("publish.js", PRIORITY)],
        HeaderCategory::Filter => vec![
            script("interface.js", PRIORITY),
            script("filtering.js", PRIORITY + 1),
            stylesheet("filtering.css"),
        ],
        HeaderCategory::Settings => vec![stylesheet("settings.css")],
    }
}
