use super::*;

#[test]
fn test_intern_dedup() {
    let interner = Interner::new();
    let a = interner.intern("Foo");
    let b = interner.intern("Foo");
    let c = interner.intern("Bar");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(&*interner.resolve(c), "Bar");
}

#[test]
fn test_empty_string_is_none() {
    let interner = Interner::new();
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
    assert_eq!(&*interner.resolve(Atom::NONE), "");
}

#[test]
fn test_common_strings_preinterned() {
    let interner = Interner::new();
    let before = interner.len();
    interner.intern("Unit");
    interner.intern("invoke");
    assert_eq!(interner.len(), before);
}

#[test]
fn test_unknown_atom_resolves_empty() {
    let interner = Interner::new();
    assert!(interner.try_resolve(Atom(9_999)).is_none());
    assert_eq!(&*interner.resolve(Atom(9_999)), "");
}
