//! Inspection and sugar must agree on every closed generic shape.

use anyhow::Result;
use pretty_assertions::assert_eq;
use typewrap::{
    create_typed_dict, normalize, Annotation, Builder, Container, Ty, WrapError, Wrapper, DICT,
    LIST, OPTIONAL, SET, TUPLE,
};

fn plain(src: &str) -> Result<Ty> {
    Ok(Ty::plain(src.parse::<Annotation>()?))
}

#[test]
fn list_and_set() -> Result<()> {
    let int = plain("int")?;
    assert_eq!(normalize(&"List[int]".parse::<Annotation>()?)?, LIST.of(int.clone())?);
    assert_eq!(normalize(&"Set[int]".parse::<Annotation>()?)?, SET.of(int)?);
    Ok(())
}

#[test]
fn tuple_order_and_arity() -> Result<()> {
    let ann: Annotation = "Tuple[str, int, str]".parse()?;
    let sugar = TUPLE.of([plain("str")?, plain("int")?, plain("str")?])?;
    assert_eq!(normalize(&ann)?, sugar);
    // swapped order is a different descriptor
    assert_ne!(normalize(&ann)?, TUPLE.of([plain("int")?, plain("str")?, plain("str")?])?);
    Ok(())
}

#[test]
fn optional_of_nested() -> Result<()> {
    let ann: Annotation = "Optional[List[Dict[str, float]]]".parse()?;
    let sugar = OPTIONAL.of(LIST.of(DICT.of(plain("str")?, plain("float")?)?)?)?;
    assert_eq!(normalize(&ann)?, sugar);
    Ok(())
}

#[test]
fn dict_matches_factory() -> Result<()> {
    let ann: Annotation = "Dict[str, int]".parse()?;
    let expected =
        create_typed_dict(normalize(&Annotation::STRING)?, normalize(&Annotation::INT)?)?;
    assert_eq!(normalize(&ann)?, Ty::Dict(expected));
    assert_eq!(normalize(&ann)?, DICT.subscript(vec![plain("str")?, plain("int")?])?);
    Ok(())
}

#[test]
fn bare_marker_then_subscript() -> Result<()> {
    let Ty::Builder(builder) = normalize(&Annotation::bare(Container::Set))? else {
        panic!("bare Set should normalize to its builder");
    };
    assert_eq!(builder, Builder::Set(SET));
    let by_inspection = normalize(&"Set[int]".parse::<Annotation>()?)?;
    assert_eq!(builder.subscript(vec![plain("int")?])?, by_inspection);
    Ok(())
}

#[test]
fn both_paths_reject_nothing_the_same_way() -> Result<()> {
    let nothing = plain("Nothing")?;
    for (src, sugar) in [
        ("List[Nothing]", LIST.of(nothing.clone())),
        ("Set[Nothing]", SET.of(nothing.clone())),
        ("Tuple[Nothing]", TUPLE.of([nothing.clone()])),
        ("Optional[Nothing]", OPTIONAL.of(nothing.clone())),
    ] {
        let inspected = normalize(&src.parse::<Annotation>()?).unwrap_err();
        assert!(matches!(inspected, WrapError::Definition { .. }), "{src}");
        assert_eq!(Err(inspected), sugar);
    }
    assert_eq!(
        LIST.of(nothing).unwrap_err().to_string(),
        format!("Type Nothing can not be wrapped in {}", Wrapper::List)
    );
    Ok(())
}

#[test]
fn repeated_calls_build_fresh_equal_trees() -> Result<()> {
    let a = LIST.of(TUPLE.of([plain("int")?, plain("Path")?])?)?;
    let b = LIST.of(TUPLE.of([plain("int")?, plain("Path")?])?)?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn named_types_normalize_the_same_after_serde() -> Result<()> {
    let ann = Annotation::list(Annotation::named("Nothing"));
    let direct = normalize(&ann)?;
    let back: Annotation = serde_json::from_str(&serde_json::to_string(&ann)?)?;
    assert_eq!(back, ann);
    assert_eq!(normalize(&back)?, direct);
    Ok(())
}
