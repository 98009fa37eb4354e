use icu_normalizer::{ComposingNormalizer, DecomposingNormalizer};
use unicode_norms_builder::hangul::*;
use unicode_norms_builder::{Category, MappingKind, Norms, NormsBuilder, ReorderingBuffer};

/// CCC из UnicodeData.txt
const CCC: &[(u32, u8)] = &[
    (0x0300, 230),
    (0x0301, 230),
    (0x0302, 230),
    (0x0304, 230),
    (0x0308, 230),
    (0x030A, 230),
    (0x0323, 220),
    (0x0327, 202),
    (0x05B0, 10),
    (0x093C, 7),
];

/// обратимые декомпозиции из UnicodeData.txt
const ROUND_TRIP: &[(u32, [u32; 2])] = &[
    (0x00C0, [0x0041, 0x0300]),
    (0x00C1, [0x0041, 0x0301]),
    (0x00C2, [0x0041, 0x0302]),
    (0x00C5, [0x0041, 0x030A]),
    (0x00DC, [0x0055, 0x0308]),
    (0x00FC, [0x0075, 0x0308]),
    (0x01D5, [0x00DC, 0x0304]),
    (0x01D6, [0x00FC, 0x0304]),
    (0x1EA0, [0x0041, 0x0323]),
    (0x1EA6, [0x00C2, 0x0300]),
    (0x1EAC, [0x1EA0, 0x0302]),
    (0x0CC7, [0x0CBF, 0x0CD5]),
    (0x0CC8, [0x0CC6, 0x0CD6]),
    (0x0CCA, [0x0CC6, 0x0CC2]),
    (0x0CCB, [0x0CCA, 0x0CD5]),
];

/// канонические декомпозиции, исключенные из композиции
const CANONICAL_ONE_WAY: &[(u32, &[u32])] = &[
    (0x2000, &[0x2002]),
    (0x2126, &[0x03A9]),
    (0x212B, &[0x00C5]),
    (0x0958, &[0x0915, 0x093C]),
];

/// декомпозиции совместимости
const COMPATIBILITY: &[(u32, &[u32])] = &[
    (0x00A0, &[0x0020]),
    (0x2002, &[0x0020]),
    (0x320E, &[0x0028, 0xAC00, 0x0029]),
];

const TEXTS: &[&str] = &[
    "\u{C0}\u{C1}\u{C2} A\u{300} A\u{301}\u{5B0}",
    "A\u{323}\u{302} A\u{302}\u{323} \u{1EAC}",
    "\u{1D5}\u{1D6} U\u{308}\u{304} u\u{308}\u{304}",
    "A\u{302}\u{300} \u{1EA6}",
    "A\u{30A} \u{212B} \u{2126}\u{2000}",
    "\u{958} \u{915}\u{93C}",
    "\u{CCA}\u{CCB}\u{CC7}\u{CC8} \u{CC6}\u{CC2}\u{CD5} \u{CBF}\u{CD5}",
    "\u{D55C}\u{AD6D}\u{C5B4} \u{1112}\u{1161}\u{11AB} \u{AC00}\u{11A8}",
    "A\u{308}\u{323}\u{5B0}\u{301}",
];

fn build(compatibility: bool) -> Norms
{
    let mut builder = NormsBuilder::new();

    for &(code, cc) in CCC {
        builder.set_cc(code, cc).unwrap();
    }

    for (code, mapping) in ROUND_TRIP {
        builder.set_round_trip_mapping(*code, mapping).unwrap();
    }

    for (code, mapping) in CANONICAL_ONE_WAY {
        builder.set_one_way_mapping(*code, mapping).unwrap();
    }

    if compatibility {
        builder.set_phase(1);

        for (code, mapping) in COMPATIBILITY {
            builder.set_one_way_mapping(*code, mapping).unwrap();
        }
    }

    builder.process().unwrap();
    builder.into_norms()
}

/// декомпозиция строки по построенным данным
fn decompose(norms: &Norms, text: &str) -> Vec<u32>
{
    let mut result = vec![];

    for c in text.chars().map(u32::from) {
        match norms.get_norm(c).and_then(|norm| norm.mapping.as_ref()) {
            Some(mapping) => result.extend_from_slice(mapping),
            None if is_hangul_syllable(c) => result.extend(decompose_hangul(c)),
            None => result.push(c),
        }
    }

    // канонический порядок на стыках декомпозиций
    let mut buffer = ReorderingBuffer::new();
    let mut ordered = vec![];

    for c in result {
        let cc = norms.get_cc(c);

        if cc == 0 && !buffer.is_empty() {
            ordered.extend(buffer.to_vec());
            buffer.reset();
        }

        buffer.append(c, cc).unwrap();
    }

    ordered.extend(buffer.to_vec());
    ordered
}

fn compose_pair(norms: &Norms, lead: u32, trail: u32) -> Option<u32>
{
    if is_jamo_l(lead) && is_jamo_v(trail) {
        let l = lead - HANGUL_L_BASE;
        let v = trail - HANGUL_V_BASE;

        return Some(HANGUL_S_BASE + (l * HANGUL_V_COUNT + v) * HANGUL_T_COUNT);
    }

    if is_hangul_syllable(lead) && (lead - HANGUL_S_BASE) % HANGUL_T_COUNT == 0 && is_jamo_t(trail) {
        return Some(lead + trail - HANGUL_T_BASE);
    }

    norms.get_norm(lead).and_then(|norm| norm.combine(trail))
}

/// композиция по построенным данным
fn compose(norms: &Norms, text: &str) -> Vec<u32>
{
    let mut result: Vec<u32> = vec![];
    let mut starter: Option<usize> = None;
    // CCC последнего некомбинированного кодпоинта после стартера
    let mut last_cc: Option<u8> = None;

    for c in decompose(norms, text) {
        let cc = norms.get_cc(c);

        if let Some(s) = starter {
            let blocked = match last_cc {
                None => false,
                Some(last_cc) => last_cc == 0 || last_cc >= cc,
            };

            if !blocked {
                if let Some(composite) = compose_pair(norms, result[s], c) {
                    result[s] = composite;
                    continue;
                }
            }
        }

        match cc {
            0 => {
                starter = Some(result.len());
                last_cc = None;
            }
            _ => last_cc = Some(cc),
        }

        result.push(c);
    }

    result
}

fn to_string(codes: Vec<u32>) -> String
{
    codes.into_iter().map(|c| char::from_u32(c).unwrap()).collect()
}

/// сравниваем нормализацию на построенных данных с ICU
#[test]
fn icu()
{
    let canonical = build(false);
    let compatibility = build(true);

    let nfd = DecomposingNormalizer::new_nfd();
    let nfkd = DecomposingNormalizer::new_nfkd();
    let nfc = ComposingNormalizer::new_nfc();

    for text in TEXTS {
        assert_eq!(to_string(decompose(&canonical, text)), nfd.normalize(text), "nfd: {}", text);
        assert_eq!(to_string(compose(&canonical, text)), nfc.normalize(text), "nfc: {}", text);
    }

    for text in TEXTS.iter().copied().chain(["\u{A0}\u{320E}", "\u{320E}\u{301}"]) {
        assert_eq!(to_string(decompose(&compatibility, text)), nfkd.normalize(text), "nfkd: {}", text);
    }
}

#[test]
fn categories()
{
    let norms = build(true);

    for (code, category) in [
        (0x0041, Category::YesYesCombinesForward),
        (0x0CC6, Category::YesYesCombinesForward),
        (0x00C0, Category::YesNoMappingOnly),
        (0x01D5, Category::YesNoMappingOnly),
        (0x00C2, Category::YesNoCombinesForward),
        (0x00DC, Category::YesNoCombinesForward),
        (0x0CCA, Category::YesNoCombinesForward),
        (0x0300, Category::MaybeYesSimple),
        (0x0CC2, Category::MaybeYesSimple),
        (0x0327, Category::YesYesWithCC),
        (0x05B0, Category::YesYesWithCC),
        (0x2126, Category::NoNo),
        (0x212B, Category::NoNo),
        (0x0958, Category::NoNo),
        (0x320E, Category::NoNo),
        (0x00A0, Category::NoNo),
        (0x2002, Category::NoNo),
        (0x2000, Category::NoNoDelta),
        (0x0062, Category::Inert),
        (0xAC00, Category::Inert),
    ] {
        assert_eq!(norms.category_of(code), category, "U+{:04X}", code);
    }

    assert_eq!(norms.get_norm(0x2000).unwrap().offset, 2);
    assert_eq!(norms.get_norm(0x2000).unwrap().mapping, Some(vec![0x20]));
    assert_eq!(norms.get_norm(0x212B).unwrap().mapping, Some(vec![0x41, 0x30A]));
    assert_eq!(norms.get_norm(0x320E).unwrap().mapping, Some(vec![0x28, 0x1100, 0x1161, 0x29]));

    for (_, norm) in norms.ranges() {
        assert!(Category::TERMINAL.contains(&norm.category));
    }
}

/// каждая пара композиции - исходная обратимая декомпозиция результата, и наоборот
#[test]
fn compositions_match_round_trip_mappings()
{
    let norms = build(false);
    let mut pairs = 0;

    for (range, norm) in norms.ranges() {
        for pair in norm.compositions.iter() {
            let composite = norms.get_norm(pair.composite).unwrap();

            assert_eq!(composite.mapping_kind, MappingKind::RoundTrip);
            assert_eq!(composite.original_mapping(), &[range.start, pair.trail]);
            assert!(norms.combines_back(pair.trail));

            pairs += 1;
        }
    }

    assert_eq!(pairs, ROUND_TRIP.len());

    for (code, mapping) in ROUND_TRIP {
        assert_eq!(norms.get_norm(mapping[0]).unwrap().combine(mapping[1]), Some(*code));
    }
}

#[test]
fn lead_and_trail_cc()
{
    let norms = build(false);

    let norm = norms.get_norm(0x1EAC).unwrap();
    assert_eq!(norm.mapping, Some(vec![0x41, 0x323, 0x302]));
    assert_eq!((norm.lead_cc, norm.trail_cc), (0, 230));

    let norm = norms.get_norm(0x0958).unwrap();
    assert_eq!((norm.lead_cc, norm.trail_cc), (0, 7));

    let norm = norms.get_norm(0x0323).unwrap();
    assert_eq!((norm.lead_cc, norm.trail_cc), (220, 220));
}
