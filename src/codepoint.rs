/// кодпоинт с CCC в виде u32: код в старших 24 битах, CCC - в младших 8
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Codepoint(u32);

impl core::fmt::Debug for Codepoint
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "{{ code: U+{:04X}, ccc: {} }}", self.code(), self.ccc())
    }
}

impl Codepoint
{
    #[inline(always)]
    pub fn new(code: u32, ccc: u8) -> Self
    {
        Self(code << 8 | (ccc as u32))
    }

    #[inline(always)]
    pub fn code(&self) -> u32
    {
        self.0 >> 8
    }

    #[inline(always)]
    pub fn ccc(&self) -> u8
    {
        self.0 as u8
    }

    #[inline(always)]
    pub fn is_starter(&self) -> bool
    {
        self.0 as u8 == 0
    }

    #[inline(always)]
    pub fn is_nonstarter(&self) -> bool
    {
        self.0 as u8 != 0
    }
}
