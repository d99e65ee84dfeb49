// ----------------------------------------------------------------------------
// Instruction word layout (MSB -> LSB)
//
//  31    27 26 25      18 17   12 11    6 5     0
// +--------+--+----------+-------+-------+-------+
// | opcode |I |   func   | srcA  | srcB  |  dst  |
// +--------+--+----------+-------+-------+-------+
//
// I: an immediate word follows the instruction word.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fields {
    pub opcode: u8,
    pub imm: bool,
    pub func: u8,
    pub src_a: u8,
    pub src_b: u8,
    pub dst: u8,
}

impl Fields {
    pub fn new(opcode: u8, func: u8) -> Self {
        Fields {
            opcode,
            func,
            ..Default::default()
        }
    }

    /// Fields wider than their slot are truncated, never spilled into a neighbour.
    pub fn to_bin(&self) -> u32 {
        ((self.opcode as u32 & 0x1F) << 27)
            | ((self.imm as u32) << 26)
            | ((self.func as u32 & 0xFF) << 18)
            | ((self.src_a as u32 & 0x3F) << 12)
            | ((self.src_b as u32 & 0x3F) << 6)
            | (self.dst as u32 & 0x3F)
    }

    pub fn from_bin(bin: u32) -> Self {
        Fields {
            opcode: ((bin >> 27) & 0x1F) as u8,
            imm: (bin >> 26) & 0x1 == 1,
            func: ((bin >> 18) & 0xFF) as u8,
            src_a: ((bin >> 12) & 0x3F) as u8,
            src_b: ((bin >> 6) & 0x3F) as u8,
            dst: (bin & 0x3F) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_all() {
        for opcode in 0..=0x1F {
            for func in 0..=0xFF {
                for reg in 0..0x40u8 {
                    for imm in [false, true] {
                        let fields = Fields {
                            opcode,
                            imm,
                            func,
                            src_a: reg,
                            src_b: 0x3F - reg,
                            dst: reg.wrapping_mul(7) & 0x3F,
                        };
                        assert_eq!(Fields::from_bin(fields.to_bin()), fields);
                    }
                }
            }
        }
    }

    #[test]
    fn test_layout() {
        let fields = Fields {
            opcode: 0x07,
            imm: true,
            func: 0x02,
            src_a: 1,
            src_b: 2,
            dst: 3,
        };
        assert_eq!(fields.to_bin(), 0x3C08_1083);
    }

    #[test]
    fn test_truncate() {
        let fields = Fields {
            opcode: 0xFF,
            src_a: 0xFF,
            src_b: 0x40,
            dst: 0x41,
            ..Default::default()
        };
        let bin = fields.to_bin();
        assert_eq!(bin, 0xF800_0000 | (0x3F << 12) | 0x01);
        let back = Fields::from_bin(bin);
        assert_eq!(back.opcode, 0x1F);
        assert!(!back.imm);
        assert_eq!(back.src_b, 0);
        assert_eq!(back.dst, 1);
    }
}
