/*!
 * Fixed keyword tables for the quality scorer.
 *
 * These tables are part of the scoring definition: changing any of them
 * changes the scores, so they are constants rather than lexicon data.
 */

/// Time expressions whose loss changes when people must act
pub const TEMPORAL_MARKERS: &[&str] = &["오늘", "내일", "오전", "오후", "새벽", "지금", "현재", "이후", "까지"];

/// Place expressions whose loss changes where people must act
pub const LOCATIVE_MARKERS: &[&str] = &["지역", "일대", "인근", "주변", "해안", "하천", "산간", "저지대"];

/// Action verbs that tell recipients what to do
pub const ACTION_MARKERS: &[&str] = &["대피", "이동", "자제", "금지", "확인", "신고", "준비", "피하"];

/// Keywords whose presence in the original signals urgency
pub const URGENCY_KEYWORDS: &[&str] = &[
    "긴급", "즉시", "대피", "주의", "경보", "위험", "피해", "재난", "신속히", "안전", "조치", "대응", "경계",
    "피하", "벗어나",
];

/// Keywords that place a text in the high urgency bucket
pub const HIGH_URGENCY: &[&str] = &[
    "긴급", "즉시", "대피", "경보", "위험", "emergency", "immediately", "evacuate", "warning", "danger",
];

/// Keywords that place a text in the medium urgency bucket
pub const MEDIUM_URGENCY: &[&str] = &[
    "주의", "경계", "조심", "대비", "유의", "caution", "advisory", "watch", "prepare",
];

/// Urgency level of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UrgencyLevel {
    /// No urgency keyword found
    Low,
    /// Advisory wording
    Medium,
    /// Immediate-action wording
    High,
}

impl UrgencyLevel {
    /// Classify a text; the highest matching bucket wins
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if HIGH_URGENCY.iter().any(|k| lowered.contains(k)) {
            Self::High
        } else if MEDIUM_URGENCY.iter().any(|k| lowered.contains(k)) {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Words that carry the same meaning as `keyword`, including itself
pub fn synonym_group(keyword: &str) -> Option<&'static [&'static str]> {
    let group: &'static [&'static str] = match keyword {
        "긴급" => &["긴급", "응급", "급한", "시급"],
        "즉시" => &["즉시", "바로", "곧바로", "신속"],
        "대피" => &["대피", "피난", "벗어나", "떠나"],
        "주의" => &["주의", "조심", "경계", "유의"],
        "경보" => &["경보", "경고", "알림", "통보"],
        "위험" => &["위험", "위험한", "유해", "해로운"],
        "이동" => &["이동", "옮기", "피신"],
        "자제" => &["자제", "삼가", "피하"],
        _ => return None,
    };
    Some(group)
}

/// Clue substrings that select a sense of an ambiguous term, per context
pub fn context_clues(term: &str) -> &'static [(&'static str, &'static [&'static str])] {
    match term {
        "전주" => &[
            ("지명", &["전주시", "전북", "전라북도", "완산구", "덕진구"]),
            ("시간", &["지난주", "전주 대비", "주간", "일주일"]),
        ],
        "수원" => &[
            ("지명", &["수원시", "경기", "팔달구", "영통구"]),
            ("물", &["식수", "상수원", "수질", "급수"]),
        ],
        "광주" => &[
            ("전라남도", &["광주광역시", "전남", "전라남도", "광산구"]),
            ("경기도", &["경기도 광주", "곤지암", "오포", "광주시"]),
        ],
        "서울" => &[
            ("지명", &["서울시", "서울특별시", "수도권", "한강"]),
            ("동사", &["서 있", "세워"]),
        ],
        "부산" => &[
            ("지명", &["부산시", "부산광역시", "해운대", "사하구"]),
            ("동사", &["흩어", "부서"]),
        ],
        "대구" => &[
            ("지명", &["대구시", "대구광역시", "경북", "수성구"]),
            ("명사", &["큰 공", "구체"]),
        ],
        "인천" => &[
            ("지명", &["인천시", "인천광역시", "인천공항", "송도"]),
            ("명사", &["어진 사람", "인물"]),
        ],
        _ => &[],
    }
}

/// Sense assumed when clues are absent or contradictory.
///
/// Only a few terms have a default; for all others the check is skipped.
pub fn default_context(term: &str) -> Option<&'static str> {
    match term {
        "전주" => Some("지명"),
        "수원" => Some("지명"),
        "광주" => Some("전라남도"),
        _ => None,
    }
}

/// Contexts of `term` with at least one clue present in `original`
pub fn firing_contexts(term: &str, original: &str) -> Vec<&'static str> {
    context_clues(term)
        .iter()
        .filter(|(_, clues)| clues.iter().any(|clue| original.contains(clue)))
        .map(|(context, _)| *context)
        .collect()
}
