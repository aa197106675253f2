//! Built-in dictionaries available before any download completes

use crate::dictionary::Dictionary;
use crate::language::Language;

const UKRAINIAN: &[(&str, &str)] = &[
    // Navigation
    ("nav.home", "Головна"),
    ("nav.about", "Про нас"),
    ("nav.services", "Послуги"),
    ("nav.projects", "Проєкти"),
    ("nav.jobs", "Вакансії"),
    ("nav.contact", "Контакти"),
    // Common
    ("common.retry", "Спробувати знову"),
    ("common.loading", "Завантаження..."),
    ("common.error", "Помилка"),
    ("common.close", "Закрити"),
    ("common.more", "Детальніше"),
    // Contact form
    ("contact.form.name", "Ваше ім'я"),
    ("contact.form.email", "Електронна пошта"),
    ("contact.form.phone", "Телефон"),
    ("contact.form.company", "Компанія"),
    ("contact.form.message", "Повідомлення"),
    ("contact.form.submit", "Надіслати"),
    ("contact.form.success", "Дякуємо, {{name}}! Ми зв'яжемося з вами найближчим часом."),
    // Sections
    ("hero.description", "Ми створюємо високоякісний професійний одяг"),
    ("hero.scroll_down", "Прокрутити вниз"),
    ("about.title", "Про нашу компанію"),
    ("services.title", "Наші послуги"),
    ("services.loading", "Завантаження послуг..."),
    ("projects.title", "Наші проєкти"),
    ("jobs.title", "Вакансії"),
];

const ENGLISH: &[(&str, &str)] = &[
    // Navigation
    ("nav.home", "Home"),
    ("nav.about", "About"),
    ("nav.services", "Services"),
    ("nav.projects", "Projects"),
    ("nav.jobs", "Careers"),
    ("nav.contact", "Contact"),
    // Common
    ("common.retry", "Try Again"),
    ("common.loading", "Loading..."),
    ("common.error", "Error"),
    ("common.close", "Close"),
    ("common.more", "Learn more"),
    // Contact form
    ("contact.form.name", "Your name"),
    ("contact.form.email", "Email"),
    ("contact.form.phone", "Phone"),
    ("contact.form.company", "Company"),
    ("contact.form.message", "Message"),
    ("contact.form.submit", "Send"),
    ("contact.form.success", "Thank you, {{name}}! We will contact you shortly."),
    // Sections
    ("hero.description", "We create high-quality professional clothing"),
    ("hero.scroll_down", "Scroll Down"),
    ("about.title", "About Our Company"),
    ("services.title", "Our Services"),
    ("services.loading", "Loading services..."),
    ("projects.title", "Our Projects"),
    ("jobs.title", "Careers"),
];

/// Keys and templates compiled into the binary for `language`
pub fn pairs(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::Ukrainian => UKRAINIAN,
        Language::English => ENGLISH,
    }
}

/// Fresh copy of the built-in dictionary for `language`
pub fn dictionary(language: Language) -> Dictionary {
    Dictionary::from_pairs(pairs(language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_the_same_keys() {
        let keys = |language| {
            let mut keys: Vec<&str> = pairs(language).iter().map(|(k, _)| *k).collect();
            keys.sort_unstable();
            keys
        };
        assert_eq!(keys(Language::Ukrainian), keys(Language::English));
    }

    #[test]
    fn test_no_empty_templates() {
        for language in Language::all() {
            assert_eq!(dictionary(language).len(), pairs(language).len());
        }
    }
}
