use crate::op::{AluFunc, DivFunc, FpuFunc, JmpFunc, MulFunc, OpCode, RoundingMode};
use crate::reg::Reg;
use crate::word::Fields;

use color_print::cformat;

impl Fields {
    /// Canonical mnemonic for the opcode/func pair. Aliases that share an
    /// encoding (`cmp` and `sub`) print as the underlying operation.
    pub fn mnemonic(&self) -> String {
        let Ok(opcode) = OpCode::try_from(self.opcode) else {
            return format!("op{}", self.opcode);
        };
        let func = match opcode {
            OpCode::ALU => AluFunc::try_from(self.func).map(|f| f.to_string()).ok(),
            OpCode::MUL => MulFunc::try_from(self.func).map(|f| f.to_string()).ok(),
            OpCode::DIV => DivFunc::try_from(self.func).map(|f| f.to_string()).ok(),
            OpCode::FPU => FpuFunc::try_from(self.func & !RoundingMode::MASK)
                .map(|f| match f {
                    FpuFunc::CVTFI | FpuFunc::CVTFU | FpuFunc::CVTIF | FpuFunc::CVTUF => {
                        f.to_string()
                    }
                    _ => format!("f{f}"),
                })
                .ok(),
            OpCode::JMP => JmpFunc::try_from(self.func)
                .map(|f| match f {
                    JmpFunc::JAL => "jmp".to_string(),
                    _ => f.to_string(),
                })
                .ok(),
            _ => return opcode.to_string(),
        };
        func.unwrap_or_else(|| format!("{opcode}.{}", self.func))
    }

    pub fn cformat(&self, imm: Option<u32>) -> String {
        let src_a = Reg::name(self.src_a);
        let src_b = Reg::name(self.src_b);
        let dst = Reg::name(self.dst);
        let rm = match OpCode::try_from(self.opcode) {
            Ok(OpCode::FPU) => RoundingMode::try_from(self.func & RoundingMode::MASK)
                .map(|rm| rm.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };
        let imm = match (self.imm, imm) {
            (true, Some(v)) => cformat!("<y>0x{:08X}</>", v),
            (true, None) => cformat!("<r>????????</>"),
            (false, _) => String::new(),
        };
        cformat!(
            "<r>{:<6}</><b>{:<4} {:<4} {:<4}</> {:<3} {}",
            self.mnemonic(),
            src_a,
            src_b,
            dst,
            rm,
            imm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_mnemonic {
        ($($name:ident: ($opcode:expr, $func:expr) => $expect:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let fields = Fields::new($opcode as u8, $func as u8);
                    assert_eq!(fields.mnemonic(), $expect);
                }
            )*
        }
    }

    test_mnemonic! {
        test_nop: (OpCode::NOP, 0) => "nop",
        test_mov: (OpCode::MOV, 0) => "mov",
        test_add: (OpCode::ALU, AluFunc::ADD) => "add",
        test_rrx: (OpCode::ALU, AluFunc::RRX) => "rrx",
        test_smulh: (OpCode::MUL, MulFunc::SMULH) => "smulh",
        test_umod: (OpCode::DIV, DivFunc::UMOD) => "umod",
        test_fadd: (OpCode::FPU, FpuFunc::ADD) => "fadd",
        test_fsqrt_rup: (OpCode::FPU, FpuFunc::SQRT as u8 | RoundingMode::RUP as u8) => "fsqrt",
        test_cvtfi: (OpCode::FPU, FpuFunc::CVTFI as u8 | RoundingMode::RTZ as u8) => "cvtfi",
        test_jeq: (OpCode::JMP, JmpFunc::JEQ) => "jeq",
        test_jmp: (OpCode::JMP, JmpFunc::JAL) => "jmp",
        test_call: (OpCode::CALL, 0) => "call",
        test_bad_func: (OpCode::ALU, 0x40) => "alu.64",
        test_bad_opcode: (0x1F, 0) => "op31",
    }
}
