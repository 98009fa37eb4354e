/// начало блока слогов хангыль
pub const HANGUL_S_BASE: u32 = 0xAC00;
/// начало блока ведущих согласных чамо
pub const HANGUL_L_BASE: u32 = 0x1100;
/// начало блока гласных чамо
pub const HANGUL_V_BASE: u32 = 0x1161;
/// завершающие согласные начинаются со следующего кодпоинта
pub const HANGUL_T_BASE: u32 = 0x11A7;
/// количество ведущих согласных
pub const HANGUL_L_COUNT: u32 = 19;
/// количество гласных
pub const HANGUL_V_COUNT: u32 = 21;
/// количество завершающих согласных (на 1 больше)
pub const HANGUL_T_COUNT: u32 = 28;
/// количество гласных * количество завершающих согласных
pub const HANGUL_N_COUNT: u32 = 588;
/// количество слогов хангыль в Unicode
pub const HANGUL_S_COUNT: u32 = 11172;

/// является ли кодпоинт слогом хангыль
#[inline]
pub fn is_hangul_syllable(code: u32) -> bool
{
    code.wrapping_sub(HANGUL_S_BASE) < HANGUL_S_COUNT
}

/// ведущая согласная чамо
#[inline]
pub fn is_jamo_l(code: u32) -> bool
{
    code.wrapping_sub(HANGUL_L_BASE) < HANGUL_L_COUNT
}

/// гласная чамо
#[inline]
pub fn is_jamo_v(code: u32) -> bool
{
    code.wrapping_sub(HANGUL_V_BASE) < HANGUL_V_COUNT
}

/// завершающая согласная чамо (без U+11A7)
#[inline]
pub fn is_jamo_t(code: u32) -> bool
{
    let t = code.wrapping_sub(HANGUL_T_BASE);

    t > 0 && t < HANGUL_T_COUNT
}

/// любой из комбинируемых чамо
#[inline]
pub fn is_jamo(code: u32) -> bool
{
    is_jamo_l(code) || is_jamo_v(code) || is_jamo_t(code)
}

/// алгоритмическая декомпозиция слога хангыль в 2 или 3 чамо
pub fn decompose_hangul(code: u32) -> Vec<u32>
{
    let s = code - HANGUL_S_BASE;

    let l = HANGUL_L_BASE + s / HANGUL_N_COUNT;
    let v = HANGUL_V_BASE + (s % HANGUL_N_COUNT) / HANGUL_T_COUNT;
    let t = s % HANGUL_T_COUNT;

    match t {
        0 => vec![l, v],
        _ => vec![l, v, HANGUL_T_BASE + t],
    }
}
