mod common;

use anyhow::Result;
use common::{names, test_service};
use tally::application::LedgerError;

#[test]
fn test_short_category_names_are_rejected() -> Result<()> {
    let mut service = test_service();

    for name in ["", "  ", "ab", " a b ", "x\ty", "  xy  "] {
        let err = service.add_category(name).unwrap_err();
        assert!(
            matches!(err, LedgerError::NameTooShort { min: 3, .. }),
            "{name:?} should be too short, got {err:?}"
        );
    }

    assert!(service.category_names().is_empty());
    Ok(())
}

#[test]
fn test_three_visible_characters_are_enough() -> Result<()> {
    let mut service = test_service();

    service.add_category("Tax")?;
    service.add_category(" a b c ")?;

    assert_eq!(service.category_names(), names(&["Tax", "a b c"]));
    Ok(())
}

#[test]
fn test_category_uniqueness_ignores_case() -> Result<()> {
    let mut service = test_service();
    service.add_category("Food")?;

    for duplicate in ["Food", "food", "FOOD", "  fOoD  "] {
        let err = service.add_category(duplicate).unwrap_err();
        assert!(matches!(err, LedgerError::CategoryAlreadyExists(_)));
    }

    assert_eq!(service.category_names(), names(&["Food"]));
    assert!(matches!(
        service.last_error(),
        Some(LedgerError::CategoryAlreadyExists(_))
    ));
    Ok(())
}

#[test]
fn test_short_person_names_are_rejected() -> Result<()> {
    let mut service = test_service();

    let err = service.add_person("Al").unwrap_err();
    assert_eq!(
        err,
        LedgerError::NameTooShort {
            name: "Al".into(),
            min: 3
        }
    );
    assert!(service.person_names().is_empty());
    Ok(())
}

#[test]
fn test_person_uniqueness_ignores_case() -> Result<()> {
    let mut service = test_service();
    service.add_person("Alice")?;

    let err = service.add_person("ALICE").unwrap_err();
    assert_eq!(err, LedgerError::PersonAlreadyExists("ALICE".into()));
    assert_eq!(service.person_names(), names(&["Alice"]));
    Ok(())
}

#[test]
fn test_categories_and_persons_are_separate_namespaces() -> Result<()> {
    let mut service = test_service();

    service.add_category("Work")?;
    service.add_person("Work")?;

    assert_eq!(service.category_names(), names(&["Work"]));
    assert_eq!(service.person_names(), names(&["Work"]));
    Ok(())
}

#[test]
fn test_person_groups_are_stored() -> Result<()> {
    let mut service = test_service();

    let person = service.add_person_with_categories("Carol", names(&["family"]))?;

    assert_eq!(person.categories, names(&["family"]));
    Ok(())
}

#[test]
fn test_sorted_views() -> Result<()> {
    let mut service = test_service();
    service.add_category("Utilities")?;
    service.add_category("Food")?;
    service.add_category("bakery")?;
    service.add_person("dave")?;
    service.add_person("Carol")?;
    service.add_person("bob")?;

    // Categories sort by plain string order, persons ignore case.
    assert_eq!(
        service.category_names(),
        names(&["Food", "Utilities", "bakery"])
    );
    assert_eq!(service.person_names(), names(&["bob", "Carol", "dave"]));
    Ok(())
}
