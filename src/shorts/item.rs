//! Feed items and the static catalog they come from.
//!
//! The catalog is read-only to the rest of the crate. It is either the
//! built-in list or a JSON file supplied with `--catalog` / `catalog_path`.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::keywords::KeywordSet;

/// One short video.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: String,
    #[serde(default)]
    pub thumbnail: String,
    pub author: String,
    #[serde(default)]
    pub author_avatar: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub comments: u64,
    /// Display label such as `"0:45"`.
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl FeedItem {
    /// Whether any of this item's keywords is in `selection`.
    pub fn matches_any(&self, selection: &KeywordSet) -> bool {
        self.keywords.iter().any(|k| selection.contains(k))
    }
}

/// Shared, immutable item catalog.
pub type Catalog = Arc<[FeedItem]>;

// ============================================================================
// Catalog loading
// ============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog file too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Catalog item #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("Duplicate item id in catalog: {0}")]
    DuplicateId(String),
}

/// Maximum catalog file size (4 MB).
const MAX_CATALOG_SIZE: u64 = 4 * 1_048_576;

/// Load a catalog from a JSON array of items.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_CATALOG_SIZE {
        return Err(CatalogError::TooLarge {
            size,
            max: MAX_CATALOG_SIZE,
        });
    }
    let content = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&content)?;
    tracing::info!(path = %path.display(), items = catalog.len(), "Loaded item catalog");
    Ok(catalog)
}

/// Parse and validate catalog JSON. Item ids must be non-empty and unique.
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
    let items: Vec<FeedItem> = serde_json::from_str(json)?;
    let mut seen = HashSet::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if item.id.trim().is_empty() {
            return Err(CatalogError::EmptyId { index });
        }
        if !seen.insert(item.id.as_str()) {
            return Err(CatalogError::DuplicateId(item.id.clone()));
        }
    }
    Ok(items.into())
}

// ============================================================================
// Built-in catalog
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub(crate) fn clip(
    id: &str,
    title: &str,
    description: &str,
    author: &str,
    likes: u64,
    views: u64,
    comments: u64,
    duration: &str,
    keywords: &[&str],
) -> FeedItem {
    FeedItem {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        video_url: format!("https://media.example.com/shorts/{}.mp4", id),
        thumbnail: format!("https://media.example.com/shorts/{}.jpg", id),
        author: author.to_string(),
        author_avatar: format!("https://media.example.com/avatars/{}.png", author),
        likes,
        views,
        comments,
        duration: duration.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// The catalog shipped with the binary.
#[rustfmt::skip]
pub fn builtin_catalog() -> Catalog {
    vec![
        clip("s1", "산책 나간 골든 리트리버", "비 온 뒤 웅덩이를 그냥 지나치지 못하는 강아지", "dog_daily", 15230, 284100, 412, "0:32", &["강아지"]),
        clip("s2", "집사를 무시하는 고양이", "불러도 대답 없는 고양이의 하루", "cat_butler", 22410, 391200, 688, "0:41", &["고양이"]),
        clip("s3", "아침 5시 기상 루틴", "한 달 동안 새벽 기상을 해보고 달라진 점", "growth_lab", 8120, 120400, 233, "0:58", &["자기개발"]),
        clip("s4", "오늘 하루도 수고했어요", "지친 하루 끝에 듣는 짧은 위로", "warm_words", 31200, 502300, 1204, "0:45", &["마음의 위로"]),
        clip("s5", "헤어지고 나서 알게 된 것들", "이별 후 3개월, 다시 나를 찾는 시간", "slow_letter", 12800, 233900, 875, "0:52", &["이별", "마음의 위로"]),
        clip("s6", "강아지와 함께 보는 로맨스 영화", "영화 보다 잠든 강아지", "dog_daily", 9870, 150200, 301, "0:28", &["강아지", "영화"]),
        clip("s7", "첫 데이트 브이로그", "설렘 가득한 첫 만남의 기록", "love_log", 18700, 340500, 956, "0:47", &["사랑"]),
        clip("s8", "할머니의 비밀 레시피", "3대째 내려오는 된장찌개", "family_table", 14300, 260100, 522, "0:55", &["가족"]),
        clip("s9", "새벽 3시 엘리베이터", "아무도 없는 층에서 멈춘 엘리베이터", "night_story", 25600, 610300, 2130, "0:59", &["공포"]),
        clip("s10", "1분 영화 리뷰: 여름 블록버스터", "스포 없이 핵심만 정리", "cine_minute", 7600, 98700, 188, "1:00", &["영화"]),
        clip("s11", "비 오는 날 발라드 라이브", "창가에서 부르는 어쿠스틱 커버", "acoustic_room", 20100, 355800, 744, "0:50", &["발라드 노래", "사랑"]),
        clip("s12", "골목길 프리스타일", "즉석 비트에 맞춘 16마디", "street_cypher", 11900, 201700, 690, "0:38", &["힙합"]),
        clip("s13", "페스티벌 메인 스테이지 드롭", "3만 명이 동시에 뛰는 순간", "drop_zone", 27300, 480900, 1502, "0:30", &["EDM"]),
        clip("s14", "고양이 vs 강아지 첫 만남", "둘은 친구가 될 수 있을까", "pet_house", 33400, 720100, 2411, "0:44", &["고양이", "강아지"]),
        clip("s15", "가족 캠핑에서 생긴 일", "텐트 치다 벌어진 대소동", "family_table", 10400, 174300, 377, "0:49", &["가족"]),
        clip("s16", "공포 영화 명장면 TOP 3", "불 끄고 보지 마세요", "cine_minute", 16800, 298400, 1033, "0:57", &["공포", "영화"]),
    ]
    .into()
}
