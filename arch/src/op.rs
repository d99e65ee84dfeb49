use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum OpCode {
    NOP = 0,
    INR,
    MOV,
    STM,
    LDM,
    PUSH,
    POP,
    ALU,
    MUL,
    DIV,
    FPU,
    JMP,
    IEN,
    IDI,
    WAIT,
    RETI,
    CALL,
    RET,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum AluFunc {
    ADD = 0,
    ADC,
    SUB,
    SBC,
    INC,
    DEC,
    NEG,
    AND,
    OR,
    XOR,
    NOT,
    LSL,
    LSR,
    ASR,
    ROR,
    RRX,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum MulFunc {
    UMULL = 0,
    UMULH,
    SMULL,
    SMULH,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum DivFunc {
    UDIV = 0,
    SDIV,
    UMOD,
    SMOD,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum FpuFunc {
    ADD = 0,
    SUB,
    MUL,
    DIV,
    SQRT,
    NEG,
    ABS,
    CVTFI,
    CVTFU,
    CVTIF,
    CVTUF,
    CMP,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum JmpFunc {
    JEQ = 1,
    JNE,
    JHI,
    JSH,
    JSL,
    JLO,
    JGT,
    JGE,
    JLE,
    JLT,
    JMI,
    JPL,
    JVS,
    JVC,
    JAL,
}

/// FPU rounding mode, stored in the high nibble of the function field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum RoundingMode {
    RNE = 0x00,
    RMM = 0x10,
    RTZ = 0x20,
    RDN = 0x30,
    RUP = 0x40,
}

impl RoundingMode {
    pub const MASK: u8 = 0xF0;

    pub fn parse(s: &str) -> Option<Self> {
        crate::fold_case(s)?.parse().ok()
    }

    /// Replace the rounding bits of an FPU function code.
    pub fn apply(func: u8, rm: u8) -> u8 {
        (func & !Self::MASK) | rm
    }
}

#[test]
fn test() {
    assert_eq!(OpCode::RET as u8, 17);
    assert_eq!(AluFunc::RRX as u8, 15);
    assert_eq!(JmpFunc::JAL as u8, 15);
    assert_eq!(FpuFunc::CMP as u8, 11);
    assert_eq!(OpCode::try_from(7), Ok(OpCode::ALU));
    assert!(OpCode::try_from(18).is_err());
    assert_eq!(OpCode::STM.to_string(), "stm");
    assert_eq!(RoundingMode::parse("RTZ"), Some(RoundingMode::RTZ));
    assert_eq!(RoundingMode::parse("rup"), Some(RoundingMode::RUP));
    assert_eq!(RoundingMode::parse("Rup"), None);
    assert_eq!(RoundingMode::apply(0x20 | 3, RoundingMode::RUP.into()), 0x43);
}
