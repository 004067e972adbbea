use std::collections::HashMap;

pub const DEFAULT_ITEMS_PER_PAGE: u64 = 100;
pub const MIN_ITEMS_PER_PAGE: u64 = 2;

/// Page window requested by a list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub items_per_page: u64,
}

impl Pagination {
    /// Read `page` and `itemsPerPage`; anything missing, unparsable or out of
    /// range falls back to page 1 and `default_items_per_page`.
    pub fn from_params(params: &HashMap<String, String>, default_items_per_page: u64) -> Self {
        let page = parse_positive(params.get("page")).unwrap_or(1);
        let items_per_page = parse_positive(params.get("itemsPerPage"))
            .filter(|n| *n >= MIN_ITEMS_PER_PAGE)
            .unwrap_or(default_items_per_page.max(MIN_ITEMS_PER_PAGE));
        Self { page, items_per_page }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.items_per_page)
    }

    /// `1 + total / items_per_page`; an exact multiple still reports one extra page.
    pub fn number_of_pages(&self, total: u64) -> u64 {
        1 + total / self.items_per_page
    }
}

fn parse_positive(raw: Option<&String>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults() {
        let p = Pagination::from_params(&params(&[]), DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(p, Pagination { page: 1, items_per_page: 100 });
        assert_eq!(p.skip(), 0);
        assert_eq!(p.number_of_pages(0), 1);
    }

    #[test]
    fn second_page_of_250() {
        let p = Pagination::from_params(&params(&[("page", "2"), ("itemsPerPage", "100")]), 100);
        assert_eq!(p.skip(), 100);
        assert_eq!(p.number_of_pages(250), 3);
    }

    #[test]
    fn invalid_values_fall_back() {
        for (page, ipp) in [("0", "1"), ("-3", "0"), ("abc", "x"), ("2.5", "")] {
            let p = Pagination::from_params(&params(&[("page", page), ("itemsPerPage", ipp)]), 50);
            assert_eq!(p, Pagination { page: 1, items_per_page: 50 }, "page={page} ipp={ipp}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        #[test]
        fn window_arithmetic(page in 1u64..10_000, ipp in 2u64..1_000, total in 0u64..1_000_000) {
            let (page_raw, ipp_raw) = (page.to_string(), ipp.to_string());
            let p = Pagination::from_params(
                &params(&[("page", page_raw.as_str()), ("itemsPerPage", ipp_raw.as_str())]),
                DEFAULT_ITEMS_PER_PAGE,
            );
            prop_assert_eq!(p.skip(), (page - 1) * ipp);
            prop_assert_eq!(p.number_of_pages(total), 1 + total / ipp);
            prop_assert!(p.number_of_pages(total) >= 1);
        }
    }
}
