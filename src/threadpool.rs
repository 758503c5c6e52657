use std::{
    panic::{self, AssertUnwindSafe},
    sync::{mpsc, Arc, Mutex},
    thread,
};
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed set of threads running submitted jobs in parallel.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<mpsc::Sender<Job>>,
}

impl ThreadPool {
    /// Spawns `size` workers. A size of zero is bumped to one so submitted
    /// jobs always run.
    pub fn new(size: usize) -> ThreadPool {
        let size = size.max(1);
        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| Worker::new(id, Arc::clone(&receiver)))
            .collect();

        ThreadPool {
            workers,
            sender: Some(sender),
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(sender) = &self.sender {
            if sender.send(Box::new(f)).is_err() {
                warn!("every worker has exited, dropping job");
            }
        }
    }

    /// Stops accepting jobs and waits for the queued ones to finish.
    pub fn join(&mut self) {
        drop(self.sender.take());

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    warn!(worker = worker.id, "worker thread panicked");
                }
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.join();
    }
}

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, receiver: Arc<Mutex<mpsc::Receiver<Job>>>) -> Worker {
        let thread = thread::spawn(move || loop {
            let job = match receiver.lock() {
                Ok(receiver) => receiver.recv(),
                Err(_) => break,
            };

            match job {
                Ok(job) => {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        warn!(worker = id, "job panicked");
                    }
                }
                Err(_) => {
                    debug!(worker = id, "queue closed, worker exiting");
                    break;
                }
            }
        });

        Worker {
            id,
            thread: Some(thread),
        }
    }
}
