use paw_core::LanguagePreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Korean,
    English,
}

impl Language {
    pub fn resolve(pref: LanguagePreference) -> Self {
        match pref {
            LanguagePreference::Korean => Language::Korean,
            LanguagePreference::English => Language::English,
            LanguagePreference::System => Self::from_locale(sys_locale::get_locale().as_deref()),
        }
    }

    fn from_locale(locale: Option<&str>) -> Self {
        match locale {
            Some(tag) if tag.to_ascii_lowercase().starts_with("ko") => Language::Korean,
            Some(_) => Language::English,
            None => Language::Korean,
        }
    }

    pub fn pick(self, ko: &'static str, en: &'static str) -> &'static str {
        match self {
            Language::Korean => ko,
            Language::English => en,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("ko-KR"), Language::Korean)]
    #[case(Some("KO"), Language::Korean)]
    #[case(Some("en-US"), Language::English)]
    #[case(Some("nl-NL"), Language::English)]
    #[case(None, Language::Korean)]
    fn locale_resolution(#[case] locale: Option<&str>, #[case] expected: Language) {
        assert_eq!(Language::from_locale(locale), expected);
    }

    #[test]
    fn explicit_preference_wins() {
        assert_eq!(
            Language::resolve(LanguagePreference::English),
            Language::English
        );
        assert_eq!(Language::resolve(LanguagePreference::Korean).pick("가", "a"), "가");
    }
}
