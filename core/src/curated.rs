//! Curated verse set written by the fallback seeder.
//!
//! The set covers every surface that reads scripture: the Genesis and John
//! openings, the Romans road, Psalm 23 in full, and every reference used by
//! the daily and emergency lists, so those flows resolve to real text even
//! when no corpus could be imported.

use crate::{Verse, canon};

/// `(book_id, chapter, verse, text)` rows in canonical order.
pub const CURATED_VERSES: &[(i64, i64, i64, &str)] = &[
    (1, 1, 1, "In the beginning God created the heaven and the earth."),
    (1, 1, 2, "And the earth was without form, and void; and darkness was upon the face of the deep. And the Spirit of God moved upon the face of the waters."),
    (1, 1, 3, "And God said, Let there be light: and there was light."),
    (1, 1, 4, "And God saw the light, that it was good: and God divided the light from the darkness."),
    (1, 1, 5, "And God called the light Day, and the darkness he called Night. And the evening and the morning were the first day."),
    (19, 3, 3, "But thou, O LORD, art a shield for me; my glory, and the lifter up of mine head."),
    (19, 23, 1, "The LORD is my shepherd; I shall not want."),
    (19, 23, 2, "He maketh me to lie down in green pastures: he leadeth me beside the still waters."),
    (19, 23, 3, "He restoreth my soul: he leadeth me in the paths of righteousness for his name's sake."),
    (19, 23, 4, "Yea, though I walk through the valley of the shadow of death, I will fear no evil: for thou art with me; thy rod and thy staff they comfort me."),
    (19, 23, 5, "Thou preparest a table before me in the presence of mine enemies: thou anointest my head with oil; my cup runneth over."),
    (19, 23, 6, "Surely goodness and mercy shall follow me all the days of my life: and I will dwell in the house of the LORD for ever."),
    (19, 32, 8, "I will instruct thee and teach thee in the way which thou shalt go: I will guide thee with mine eye."),
    (19, 34, 17, "The righteous cry, and the LORD heareth, and delivereth them out of all their troubles."),
    (19, 46, 1, "God is our refuge and strength, a very present help in trouble."),
    (19, 118, 24, "This is the day which the LORD hath made; we will rejoice and be glad in it."),
    (20, 3, 5, "Trust in the LORD with all thine heart; and lean not unto thine own understanding."),
    (20, 3, 6, "In all thy ways acknowledge him, and he shall direct thy paths."),
    (23, 40, 31, "But they that wait upon the LORD shall renew their strength; they shall mount up with wings as eagles; they shall run, and not be weary; and they shall walk, and not faint."),
    (23, 41, 10, "Fear thou not; for I am with thee: be not dismayed; for I am thy God: I will strengthen thee; yea, I will help thee; yea, I will uphold thee with the right hand of my righteousness."),
    (23, 53, 5, "But he was wounded for our transgressions, he was bruised for our iniquities: the chastisement of our peace was upon him; and with his stripes we are healed."),
    (24, 29, 11, "For I know the thoughts that I think toward you, saith the LORD, thoughts of peace, and not of evil, to give you an expected end."),
    (40, 6, 34, "Take therefore no thought for the morrow: for the morrow shall take thought for the things of itself. Sufficient unto the day is the evil thereof."),
    (40, 11, 28, "Come unto me, all ye that labour and are heavy laden, and I will give you rest."),
    (40, 26, 41, "Watch and pray, that ye enter not into temptation: the spirit indeed is willing, but the flesh is weak."),
    (40, 28, 19, "Go ye therefore, and teach all nations, baptizing them in the name of the Father, and of the Son, and of the Holy Ghost:"),
    (40, 28, 20, "Teaching them to observe all things whatsoever I have commanded you: and, lo, I am with you alway, even unto the end of the world. Amen."),
    (43, 1, 1, "In the beginning was the Word, and the Word was with God, and the Word was God."),
    (43, 1, 2, "The same was in the beginning with God."),
    (43, 1, 3, "All things were made by him; and without him was not any thing made that was made."),
    (43, 1, 4, "In him was life; and the life was the light of men."),
    (43, 1, 5, "And the light shineth in darkness; and the darkness comprehended it not."),
    (43, 3, 16, "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life."),
    (45, 3, 23, "For all have sinned, and come short of the glory of God;"),
    (45, 6, 23, "For the wages of sin is death; but the gift of God is eternal life through Jesus Christ our Lord."),
    (45, 8, 28, "And we know that all things work together for good to them that love God, to them who are the called according to his purpose."),
    (45, 8, 29, "For whom he did foreknow, he also did predestinate to be conformed to the image of his Son, that he might be the firstborn among many brethren."),
    (45, 8, 30, "Moreover whom he did predestinate, them he also called: and whom he called, them he also justified: and whom he justified, them he also glorified."),
    (45, 8, 31, "What shall we then say to these things? If God be for us, who can be against us?"),
    (46, 10, 13, "There hath no temptation taken you but such as is common to man: but God is faithful, who will not suffer you to be tempted above that ye are able; but will with the temptation also make a way to escape, that ye may be able to bear it."),
    (47, 1, 3, "Blessed be God, even the Father of our Lord Jesus Christ, the Father of mercies, and the God of all comfort;"),
    (50, 4, 6, "Be careful for nothing; but in every thing by prayer and supplication with thanksgiving let your requests be made known unto God."),
    (50, 4, 7, "And the peace of God, which passeth all understanding, shall keep your hearts and minds through Christ Jesus."),
    (50, 4, 8, "Finally, brethren, whatsoever things are true, whatsoever things are honest, whatsoever things are just, whatsoever things are pure, whatsoever things are lovely, whatsoever things are of good report; if there be any virtue, and if there be any praise, think on these things."),
    (50, 4, 13, "I can do all things through Christ which strengtheneth me."),
    (59, 1, 5, "If any of you lack wisdom, let him ask of God, that giveth to all men liberally, and upbraideth not; and it shall be given him."),
    (59, 4, 7, "Submit yourselves therefore to God. Resist the devil, and he will flee from you."),
    (60, 5, 7, "Casting all your care upon him; for he careth for you."),
];

/// The curated set as [`Verse`] rows with deterministic ids.
pub fn verses() -> Vec<Verse> {
    CURATED_VERSES
        .iter()
        .map(|(book_id, chapter, verse, text)| Verse {
            id: Verse::canonical_id(*book_id, *chapter, *verse),
            book_id: *book_id,
            chapter: *chapter,
            verse: *verse,
            text: (*text).to_string(),
        })
        .collect()
}

/// Looks up a curated verse by canonical book name.
pub fn find(book: &str, chapter: i64, verse: i64) -> Option<&'static str> {
    let book_id = canon::book_id(book)?;
    CURATED_VERSES
        .iter()
        .find(|(b, c, v, _)| *b == book_id && *c == chapter && *v == verse)
        .map(|(_, _, _, text)| *text)
}
