use std::sync::Arc;

use super::{manual_ctx, one_by_one};
use crate::engine::{ProcessorWorker, Service};
use crate::error::WorkerFault;
use crate::net::{ClassId, Packet, PathId};
use crate::sim::{Clock, SimTime};

#[test]
fn latency_is_dequeue_time_plus_service_minus_creation() {
    let (clock, ctx) = manual_ctx(one_by_one(10), SimTime(1_000));
    let worker = ProcessorWorker::new(Arc::clone(&ctx), PathId(0), 0);

    // 服务时间 1024B @ 100Mbps = 81_920ns
    let out = worker.serve(Packet::new(SimTime(100), ClassId(0)));
    let expected = SimTime(1_000 + 81_920 - 100);
    assert_eq!(
        out,
        Ok(Service::Completed {
            class: ClassId(0),
            latency: expected
        })
    );
    assert_eq!(clock.now(), SimTime(1_000 + 81_920));
    assert_eq!(ctx.registry.latency_samples(ClassId(0)), vec![expected.0]);

    let totals = ctx.registry.totals();
    assert_eq!(totals.processed[0][0], 1);
    assert_eq!(totals.anomalies[0], 0);
}

#[test]
fn non_positive_latency_is_discarded_without_touching_accumulators() {
    let (_clock, ctx) = manual_ctx(one_by_one(10), SimTime::ZERO);
    let worker = ProcessorWorker::new(Arc::clone(&ctx), PathId(0), 0);

    // packet 时间戳在“未来”
    let out = worker.serve(Packet::new(SimTime::from_secs(1), ClassId(0)));
    assert_eq!(out, Ok(Service::Discarded { class: ClassId(0) }));
    // 时间戳恰好等于完成时刻也视为异常
    let out = worker.serve(Packet::new(SimTime(2 * 81_920), ClassId(0)));
    assert_eq!(out, Ok(Service::Discarded { class: ClassId(0) }));

    let totals = ctx.registry.totals();
    assert_eq!(totals.processed[0][0], 0);
    assert_eq!(totals.anomalies[0], 2);
    assert!(ctx.registry.latency_samples(ClassId(0)).is_empty());
}

#[test]
fn unknown_class_is_a_fault_not_a_crash() {
    let (_clock, ctx) = manual_ctx(one_by_one(10), SimTime::ZERO);
    let worker = ProcessorWorker::new(Arc::clone(&ctx), PathId(0), 0);
    assert_eq!(
        worker.serve(Packet::new(SimTime::ZERO, ClassId(9))),
        Err(WorkerFault::UnknownClass(ClassId(9)))
    );
}

#[test]
fn processor_drains_queue_then_stops_after_deadline() {
    // duration = 1ms, grace = 0：处理完 13 个 packet 后时钟已过截止时间，下一次超时（10ms）即退出
    let (clock, ctx) = manual_ctx(one_by_one(100), SimTime::ZERO);
    for i in 0..13 {
        ctx.queues[0]
            .try_enqueue(Packet::new(SimTime(i), ClassId(0)))
            .expect("enqueue");
    }
    let served = ProcessorWorker::new(Arc::clone(&ctx), PathId(0), 0).run();
    assert_eq!(served, 13);
    assert!(ctx.queues[0].is_empty());
    assert_eq!(clock.now(), SimTime(13 * 81_920 + 10_000_000));
    assert_eq!(ctx.registry.totals().processed[0][0], 13);
    assert_eq!(ctx.registry.latency_samples(ClassId(0)).len(), 13);
}

#[test]
fn idle_processor_advances_the_clock_through_the_grace_period() {
    // duration + grace = 51ms，每次 10ms 超时都推进时钟，第 6 次超时后越过截止时间
    let mut scenario = one_by_one(10);
    scenario.episode.processor_grace_seconds = 0.05;
    let (clock, ctx) = manual_ctx(scenario, SimTime::ZERO);
    let served = ProcessorWorker::new(Arc::clone(&ctx), PathId(0), 0).run();
    assert_eq!(served, 0);
    assert_eq!(clock.now(), SimTime::from_millis(60));
}

#[test]
fn faulty_packets_do_not_stop_the_worker() {
    let (_clock, ctx) = manual_ctx(one_by_one(100), SimTime::ZERO);
    for i in 0..40 {
        let class = if i % 2 == 0 { ClassId(0) } else { ClassId(5) };
        ctx.queues[0]
            .try_enqueue(Packet::new(SimTime(i), class))
            .expect("enqueue");
    }
    let served = ProcessorWorker::new(Arc::clone(&ctx), PathId(0), 0).run();
    assert_eq!(served, 20);
    let totals = ctx.registry.totals();
    assert_eq!(totals.path_faults, vec![20]);
    assert_eq!(totals.processed[0][0], 20);
}
