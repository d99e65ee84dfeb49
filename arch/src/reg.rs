use bimap::BiMap;
use once_cell::sync::Lazy;

pub struct Reg;

impl Reg {
    pub const SP: u8 = 61;
    pub const SR: u8 = 62;
    pub const PC: u8 = 63;

    pub const COUNT: u8 = 64;
}

static NAMES: Lazy<BiMap<&'static str, u8>> = Lazy::new(|| {
    let mut names = BiMap::new();
    names.insert("sp", Reg::SP);
    names.insert("sr", Reg::SR);
    names.insert("pc", Reg::PC);
    names
});

impl Reg {
    /// Index of a reserved register name (`sp`, `SR`, ...).
    pub fn by_name(s: &str) -> Option<u8> {
        let name = crate::fold_case(s)?;
        NAMES.get_by_left(name.as_str()).copied()
    }

    pub fn name(idx: u8) -> String {
        match NAMES.get_by_right(&idx) {
            Some(name) => name.to_string(),
            None => format!("r{idx}"),
        }
    }
}

#[test]
fn test() {
    assert_eq!(Reg::by_name("sp"), Some(61));
    assert_eq!(Reg::by_name("SR"), Some(62));
    assert_eq!(Reg::by_name("pC"), None);
    assert_eq!(Reg::by_name("r1"), None);
    assert_eq!(Reg::name(63), "pc");
    assert_eq!(Reg::name(5), "r5");
}
