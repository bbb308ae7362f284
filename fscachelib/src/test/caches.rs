use std::error::Error;
use crate::block::BlockId;
use crate::cache::{BlockCache, DirectMappedCache, GenericCache, GlobalLruCache, SetAssociativeCache};
use crate::config::{CacheConfig, CacheKindConfig};
use crate::error::ConfigurationError;
use crate::replacement_policies::{CacheEntry, LeastRecentlyUsed};
use crate::simulator::config_to_cache;
use crate::stats::AccessStats;

fn all_resident<C: BlockCache>(cache: &mut C, blocks: &[BlockId]) -> bool {
    let mut stats = AccessStats::new();
    blocks.iter().all(|&b| cache.access(b, &mut stats))
}

#[test]
fn no_evictions_below_capacity() -> Result<(), Box<dyn Error>> {
    // Distinct slots for the direct mapped cache, two per set for the 2-way cache
    let blocks: Vec<BlockId> = (0..8).collect();
    let mut direct = DirectMappedCache::new(8)?;
    let mut two_way = SetAssociativeCache::new(8, 2)?;
    let mut full = GlobalLruCache::new(8)?;
    for &b in &blocks {
        direct.insert(b);
        two_way.insert(b);
        full.insert(b + 100);
    }
    assert!(all_resident(&mut direct, &blocks));
    assert!(all_resident(&mut two_way, &blocks));
    let shifted: Vec<BlockId> = blocks.iter().map(|b| b + 100).collect();
    assert!(all_resident(&mut full, &shifted));
    assert_eq!(full.resident_blocks(), 8);
    Ok(())
}

#[test]
fn direct_mapped_eviction_is_positional() -> Result<(), Box<dyn Error>> {
    let mut cache = DirectMappedCache::new(4)?;
    let mut stats = AccessStats::new();
    for b in 0..4 {
        cache.insert(b);
    }
    // Recency doesn't protect slot 0
    assert!(cache.access(0, &mut stats));
    cache.insert(4);
    assert!(!cache.contains(0));
    assert!(cache.contains(4));
    assert!((1..4).all(|b| cache.contains(b)));
    assert_eq!(cache.resident_blocks(), 4);
    Ok(())
}

#[test]
fn direct_mapped_reinsert_and_miss() -> Result<(), Box<dyn Error>> {
    let mut cache = DirectMappedCache::new(2)?;
    let mut stats = AccessStats::new();
    for b in [5, 7, 5] {
        cache.insert(b);
    }
    assert!(cache.access(5, &mut stats));
    assert!(!cache.access(7, &mut stats));
    let misses = stats.cache_misses;
    assert!(!cache.access(99, &mut stats));
    assert_eq!(stats.cache_misses, misses + 1);
    assert_eq!(stats.cache_hits, 1);
    Ok(())
}

#[test]
fn set_associative_evicts_least_recent_in_set() -> Result<(), Box<dyn Error>> {
    // 4 sets of 2, blocks 0, 4 and 8 all map to set 0
    let mut cache = SetAssociativeCache::new(8, 2)?;
    cache.insert(0);
    cache.insert(4);
    cache.insert(8);
    assert!(!cache.contains(0));
    assert!(cache.contains(4) && cache.contains(8));
    Ok(())
}

#[test]
fn set_associative_access_refreshes_recency() -> Result<(), Box<dyn Error>> {
    let mut cache = SetAssociativeCache::new(8, 2)?;
    let mut stats = AccessStats::new();
    cache.insert(0);
    cache.insert(4);
    assert!(cache.access(0, &mut stats));
    cache.insert(8);
    assert!(cache.contains(0));
    assert!(!cache.contains(4));
    // Other sets are untouched
    cache.insert(1);
    assert!(cache.contains(1) && cache.contains(0) && cache.contains(8));
    assert_eq!(cache.resident_blocks(), 3);
    Ok(())
}

#[test]
fn global_lru_evicts_first_inserted() -> Result<(), Box<dyn Error>> {
    let mut cache = GlobalLruCache::new(3)?;
    for b in 1..=4 {
        cache.insert(b);
    }
    assert!(!cache.contains(1));
    assert_eq!(cache.recency_order(), vec![4, 3, 2]);

    let mut stats = AccessStats::new();
    assert!(cache.access(2, &mut stats));
    cache.insert(5);
    assert_eq!(cache.recency_order(), vec![5, 2, 4]);
    Ok(())
}

#[test]
fn mark_dirty_on_missing_block_is_a_no_op() -> Result<(), Box<dyn Error>> {
    let mut caches: Vec<GenericCache> = vec![
        DirectMappedCache::new(4)?.into(),
        SetAssociativeCache::new(4, 2)?.into(),
        GlobalLruCache::new(4)?.into(),
    ];
    for cache in &mut caches {
        let mut stats = AccessStats::new();
        cache.insert(1);
        cache.mark_dirty(42);
        assert!(!cache.is_dirty(42));
        assert!(!cache.contains(42));
        assert!(!cache.is_dirty(1));
        assert_eq!(cache.resident_blocks(), 1);
        assert!(cache.access(1, &mut stats));
        assert_eq!(stats, AccessStats { cache_hits: 1, ..AccessStats::default() });
    }
    Ok(())
}

#[test]
fn reinsert_clears_dirty_flag() -> Result<(), Box<dyn Error>> {
    let mut caches: Vec<GenericCache> = vec![
        DirectMappedCache::new(4)?.into(),
        SetAssociativeCache::new(4, 2)?.into(),
        GlobalLruCache::new(4)?.into(),
    ];
    for cache in &mut caches {
        cache.insert(3);
        cache.mark_dirty(3);
        assert!(cache.is_dirty(3));
        cache.insert(3);
        assert!(!cache.is_dirty(3));
        assert_eq!(cache.resident_blocks(), 1);
    }
    Ok(())
}

#[test]
fn invalid_configurations_are_rejected() {
    assert_eq!(SetAssociativeCache::new(8, 0).err(), Some(ConfigurationError::ZeroWays));
    assert_eq!(SetAssociativeCache::new(0, 2).err(), Some(ConfigurationError::ZeroCapacity));
    assert_eq!(
        SetAssociativeCache::new(12, 8).err(),
        Some(ConfigurationError::UnevenSets { capacity: 12, ways: 8 })
    );
    assert_eq!(DirectMappedCache::new(0).err(), Some(ConfigurationError::ZeroCapacity));
    assert_eq!(GlobalLruCache::new(0).err(), Some(ConfigurationError::ZeroCapacity));
}

#[test]
fn cache_configs_build_matching_caches() -> Result<(), Box<dyn Error>> {
    let config = |kind| CacheConfig { name: "c".to_string(), capacity: 24, kind };
    assert!(matches!(config_to_cache(&config(CacheKindConfig::Direct))?, GenericCache::DirectMapped(_)));
    assert!(matches!(config_to_cache(&config(CacheKindConfig::Full))?, GenericCache::GlobalLru(_)));
    match config_to_cache(&config(CacheKindConfig::Ways(3)))? {
        GenericCache::SetAssociative(c) => assert_eq!((c.ways(), c.num_sets()), (3, 8)),
        _ => panic!("expected a set associative cache"),
    }
    match config_to_cache(&config(CacheKindConfig::EightWay))? {
        GenericCache::SetAssociative(c) => assert_eq!(c.capacity(), 24),
        _ => panic!("expected a set associative cache"),
    }
    assert!(config_to_cache(&config(CacheKindConfig::Ways(5))).is_err());
    Ok(())
}

#[test]
fn recency_list_orders_and_recycles() {
    let mut lru = LeastRecentlyUsed::with_capacity(4);
    assert_eq!(lru.pop_back(), None);
    for b in [10, 20, 30] {
        lru.push_front(b);
    }
    assert!(lru.touch(10));
    assert!(!lru.touch(99));
    assert_eq!(lru.iter().collect::<Vec<_>>(), vec![10, 30, 20]);
    assert_eq!(lru.least_recent(), Some(20));

    lru.mark_dirty(20);
    assert_eq!(lru.pop_back(), Some(CacheEntry { block: 20, dirty: true }));
    lru.push_front(40);
    assert_eq!(lru.iter().collect::<Vec<_>>(), vec![40, 10, 30]);
    assert_eq!(lru.len(), 3);

    while lru.pop_back().is_some() {}
    assert!(lru.is_empty());
    assert_eq!(lru.iter().count(), 0);
    lru.push_front(50);
    assert_eq!(lru.least_recent(), Some(50));
}
