// Built-in stop words for keyword extraction (English and Chinese chat filler)

pub const DEFAULT_STOP_WORDS: &[&str] = &[
    // Chinese
    "的", "了", "在", "是", "我", "你", "他", "她", "它", "我们", "你们", "他们", "这", "那",
    "这个", "那个", "什么", "怎么", "为什么", "因为", "所以", "然后", "但是", "而且", "可以",
    "不是", "没有", "就是", "还是", "如果", "会", "要", "去", "来", "到", "有", "很", "也", "都",
    // English
    "and", "the", "a", "an", "is", "are", "was", "were", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "but", "or", "not", "if", "when",
    "where", "how", "why", "what", "who", "which", "this", "that", "these", "those", "here",
    "there", "now", "then", "yes", "no", "for", "with", "from", "into", "about", "you", "your",
    "our", "their", "its", "they", "them", "can", "just", "also", "all", "any", "some", "been",
    "being", "than", "too", "very", "let", "lets", "get", "got", "okay",
];
