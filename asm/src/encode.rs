use crate::assembler::State;
use crate::error::Error;
use crate::lexer::Address;
use crate::literal::{is_register, to_float, to_int, to_rounding_mode, to_word, LiteralError, Word};
use arch::op::{AluFunc, DivFunc, FpuFunc, JmpFunc, MulFunc, OpCode, RoundingMode};
use arch::word::Fields;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::ops::RangeInclusive;

/// Operand pattern of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `m`
    None,
    /// `m dst, imm`
    DstImm,
    /// `m src, dst`
    SrcBDst,
    /// `m src, [addr]`
    SrcBAddr,
    /// `m dst, [addr]`
    DstAddr,
    /// `m src`
    SrcB,
    /// `m dst`
    Dst,
    /// `m a, b[, d]`
    SrcASrcBDst,
    /// `m a[, d]`
    SrcADst,
    /// `m a, b[, d|rm][, rm]`
    SrcASrcBDstRm,
    /// `m a[, d|rm][, rm]`
    SrcADstRm,
    /// `m a, b`
    SrcASrcB,
    /// `m [addr]` or `m label`
    Addr,
}

impl Shape {
    pub fn arity(&self) -> RangeInclusive<usize> {
        match self {
            Shape::None => 0..=0,
            Shape::DstImm | Shape::SrcBDst | Shape::SrcBAddr | Shape::DstAddr => 2..=2,
            Shape::SrcB | Shape::Dst | Shape::Addr => 1..=1,
            Shape::SrcASrcBDst => 2..=3,
            Shape::SrcADst => 1..=2,
            Shape::SrcASrcBDstRm => 2..=4,
            Shape::SrcADstRm => 1..=3,
            Shape::SrcASrcB => 2..=2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstDef {
    pub opcode: OpCode,
    pub func: u8,
    pub shape: Shape,
}

static MNEMONICS: Lazy<IndexMap<String, InstDef>> = Lazy::new(|| {
    let mut map = IndexMap::new();
    let mut def = |name: String, opcode: OpCode, func: u8, shape: Shape| {
        map.insert(name, InstDef { opcode, func, shape });
    };

    for op in [OpCode::NOP, OpCode::IEN, OpCode::IDI, OpCode::WAIT, OpCode::RETI, OpCode::RET] {
        def(op.to_string(), op, 0, Shape::None);
    }
    def("inr".into(), OpCode::INR, 0, Shape::DstImm);
    def("mov".into(), OpCode::MOV, 0, Shape::SrcBDst);
    def("stm".into(), OpCode::STM, 0, Shape::SrcBAddr);
    def("ldm".into(), OpCode::LDM, 0, Shape::DstAddr);
    def("push".into(), OpCode::PUSH, 0, Shape::SrcB);
    def("pop".into(), OpCode::POP, 0, Shape::Dst);

    use AluFunc::*;
    for func in [ADD, ADC, SUB, SBC, AND, OR, XOR, LSL, LSR, ASR, ROR] {
        def(func.to_string(), OpCode::ALU, func.into(), Shape::SrcASrcBDst);
    }
    for func in [INC, DEC, NEG, NOT, RRX] {
        def(func.to_string(), OpCode::ALU, func.into(), Shape::SrcADst);
    }
    for func in [MulFunc::UMULL, MulFunc::UMULH, MulFunc::SMULL, MulFunc::SMULH] {
        def(func.to_string(), OpCode::MUL, func.into(), Shape::SrcASrcBDst);
    }
    for func in [DivFunc::UDIV, DivFunc::SDIV, DivFunc::UMOD, DivFunc::SMOD] {
        def(func.to_string(), OpCode::DIV, func.into(), Shape::SrcASrcBDst);
    }

    let rne = u8::from(RoundingMode::RNE);
    let rtz = u8::from(RoundingMode::RTZ);
    for func in [FpuFunc::ADD, FpuFunc::SUB, FpuFunc::MUL, FpuFunc::DIV] {
        def(format!("f{func}"), OpCode::FPU, u8::from(func) | rne, Shape::SrcASrcBDstRm);
    }
    def("fsqrt".into(), OpCode::FPU, u8::from(FpuFunc::SQRT) | rne, Shape::SrcADstRm);
    def("fneg".into(), OpCode::FPU, FpuFunc::NEG.into(), Shape::SrcADstRm);
    def("fabs".into(), OpCode::FPU, FpuFunc::ABS.into(), Shape::SrcADstRm);
    for func in [FpuFunc::CVTFI, FpuFunc::CVTFU] {
        def(func.to_string(), OpCode::FPU, u8::from(func) | rtz, Shape::SrcADstRm);
    }
    for func in [FpuFunc::CVTIF, FpuFunc::CVTUF] {
        def(func.to_string(), OpCode::FPU, u8::from(func) | rne, Shape::SrcADstRm);
    }

    def("cmp".into(), OpCode::ALU, SUB.into(), Shape::SrcASrcB);
    def("cpc".into(), OpCode::ALU, SBC.into(), Shape::SrcASrcB);
    def("fcmp".into(), OpCode::FPU, FpuFunc::CMP.into(), Shape::SrcASrcB);

    use JmpFunc::*;
    for func in [JEQ, JNE, JHI, JSH, JSL, JLO, JGT, JGE, JLE, JLT, JMI, JPL, JVS, JVC] {
        def(func.to_string(), OpCode::JMP, func.into(), Shape::Addr);
    }
    def("jmp".into(), OpCode::JMP, JAL.into(), Shape::Addr);
    def("call".into(), OpCode::CALL, 0, Shape::Addr);

    map
});

/// Instruction definition for a mnemonic spelled in all lower or all upper case.
pub fn lookup(mnemonic: &str) -> Option<&'static InstDef> {
    MNEMONICS.get(arch::fold_case(mnemonic)?.as_str())
}

pub fn mnemonics() -> impl Iterator<Item = &'static str> {
    MNEMONICS.keys().map(String::as_str)
}

// ----------------------------------------------------------------------------
// Encoder

/// Append the words of one instruction. On an arity mismatch nothing is
/// emitted; a malformed operand is reported and encoded as zero.
pub(crate) fn encode(st: &mut State, mnemonic: &str, def: &InstDef, args: &[String]) {
    if !def.shape.arity().contains(&args.len()) {
        st.error(Error::InstructionArity(mnemonic.to_string()));
        return;
    }

    let base = Fields::new(def.opcode.into(), def.func);
    match def.shape {
        Shape::None => emit(st, base, None),
        Shape::DstImm => {
            let dst = st.reg(&args[0]);
            let imm = st.accept(to_word(&args[1]));
            emit(st, Fields { dst, ..base }, Some(imm));
        }
        Shape::SrcBDst => {
            let src_b = st.reg(&args[0]);
            let dst = st.reg(&args[1]);
            emit(st, Fields { src_b, dst, ..base }, None);
        }
        Shape::SrcBAddr => {
            let Some((src_a, offset)) = address(st, &args[1]) else {
                return;
            };
            let src_b = st.reg(&args[0]);
            emit(st, Fields { src_a, src_b, ..base }, offset);
        }
        Shape::DstAddr => {
            let Some((src_a, offset)) = address(st, &args[1]) else {
                return;
            };
            let dst = st.reg(&args[0]);
            emit(st, Fields { src_a, dst, ..base }, offset);
        }
        Shape::SrcB => {
            let src_b = st.reg(&args[0]);
            emit(st, Fields { src_b, ..base }, None);
        }
        Shape::Dst => {
            let dst = st.reg(&args[0]);
            emit(st, Fields { dst, ..base }, None);
        }
        Shape::SrcASrcBDst => {
            let src_a = st.reg(&args[0]);
            let dst = match args.get(2) {
                Some(dst) => st.reg(dst),
                None => src_a,
            };
            reg_or_imm(st, Fields { src_a, dst, ..base }, &args[1], to_int);
        }
        Shape::SrcADst => {
            let src_a = st.reg(&args[0]);
            let dst = match args.get(1) {
                Some(dst) => st.reg(dst),
                None => src_a,
            };
            emit(st, Fields { src_a, dst, ..base }, None);
        }
        Shape::SrcASrcBDstRm => {
            let src_a = st.reg(&args[0]);
            let (dst, func) = dst_or_rm(st, src_a, def.func, &args[2..]);
            reg_or_imm(st, Fields { src_a, dst, func, ..base }, &args[1], to_float);
        }
        Shape::SrcADstRm => {
            let src_a = st.reg(&args[0]);
            let (dst, func) = dst_or_rm(st, src_a, def.func, &args[1..]);
            emit(st, Fields { src_a, dst, func, ..base }, None);
        }
        Shape::SrcASrcB => {
            let src_a = st.reg(&args[0]);
            reg_or_imm(st, Fields { src_a, ..base }, &args[1], to_int);
        }
        Shape::Addr => {
            let arg = &args[0];
            if arg.starts_with('[') {
                let Some((src_a, offset)) = address(st, arg) else {
                    return;
                };
                emit(st, Fields { src_a, ..base }, offset);
            } else {
                emit(st, Fields { imm: true, ..base }, None);
                st.code.add_reference(arg, &st.loc);
            }
        }
    }
}

/// Instruction word, followed by the immediate word if there is one.
fn emit(st: &mut State, fields: Fields, imm: Option<Word>) {
    let fields = Fields {
        imm: fields.imm || imm.is_some(),
        ..fields
    };
    st.code.push(fields.to_bin());
    if let Some(imm) = imm {
        st.code.push(imm);
    }
}

/// Second source as a register, or else an immediate converted by `conv`.
fn reg_or_imm(
    st: &mut State,
    fields: Fields,
    arg: &str,
    conv: fn(&str) -> Result<Word, LiteralError>,
) {
    if is_register(arg) {
        let src_b = st.reg(arg);
        emit(st, Fields { src_b, ..fields }, None);
    } else {
        let imm = st.accept(conv(arg));
        emit(st, fields, Some(imm));
    }
}

/// Trailing operands of float instructions: `[dst|rm]` or `[dst, rm]`.
/// A rounding mode replaces the default one carried by `func`.
fn dst_or_rm(st: &mut State, src_a: u8, func: u8, rest: &[String]) -> (u8, u8) {
    match rest {
        [dst, rm] => {
            let rm = st.accept(to_rounding_mode(rm));
            (st.reg(dst), RoundingMode::apply(func, rm))
        }
        [dst] if is_register(dst) => (st.reg(dst), func),
        [rm] => {
            let rm = st.accept(to_rounding_mode(rm));
            (src_a, RoundingMode::apply(func, rm))
        }
        _ => (src_a, func),
    }
}

/// Base register (0 when absent) and immediate offset of a bracketed address.
fn address(st: &mut State, arg: &str) -> Option<(u8, Option<Word>)> {
    let Some(addr) = Address::parse(arg) else {
        st.error(Error::InvalidAddress(arg.to_string()));
        return None;
    };
    let base = match &addr.base {
        Some(reg) => st.reg(reg),
        None => 0,
    };
    let offset = addr.offset.map(|offset| st.accept(to_int(&offset)));
    Some((base, offset))
}
